//! Coalescing cache of the latest blockhash.
//!
//! Every submission needs a recent blockhash, and parallel submissions would
//! otherwise each fetch one. [`BlockhashCache`] keeps a single snapshot for a
//! freshness window and makes concurrent callers share one fetch:
//!
//! - **Fresh snapshot**: returned without a network call
//! - **Missing or expired**: the first caller fetches while holding the lock;
//!   callers arriving meanwhile wait and then read the stored result
//! - **Rejected as stale**: [`refresh_stale`](BlockhashCache::refresh_stale)
//!   replaces it, unless another caller already did

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::chain::{BlockhashSnapshot, PaymentRpc, TransportError};

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
struct CachedBlockhash {
    snapshot: BlockhashSnapshot,
    fetched_at: Instant,
}

impl CachedBlockhash {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Shared blockhash cache over a [`PaymentRpc`].
///
/// Share one instance (behind an `Arc`) between all submitters that talk to
/// the same cluster.
#[derive(Debug)]
pub struct BlockhashCache<R> {
    rpc: R,
    ttl: Duration,
    state: Mutex<Option<CachedBlockhash>>,
}

impl<R: PaymentRpc> BlockhashCache<R> {
    /// Creates an empty cache with the given freshness window.
    ///
    /// A zero `ttl` disables caching but still serializes fetches.
    pub fn new(rpc: R, ttl: Duration) -> Self {
        Self {
            rpc,
            ttl,
            state: Mutex::new(None),
        }
    }

    /// Returns the transport the cache fetches through.
    pub const fn rpc(&self) -> &R {
        &self.rpc
    }

    /// Returns the freshness window.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a blockhash no older than the freshness window.
    ///
    /// # Errors
    ///
    /// Returns the transport error if a fetch was needed and failed. Nothing
    /// is cached in that case.
    pub async fn get_current_blockhash(&self) -> Result<BlockhashSnapshot, TransportError> {
        let mut state = self.state.lock().await;
        if let Some(cached) = state.as_ref()
            && cached.is_fresh(self.ttl)
        {
            #[cfg(feature = "telemetry")]
            tracing::debug!(blockhash = %cached.snapshot.blockhash, "Blockhash cache hit");
            return Ok(cached.snapshot);
        }
        self.fetch(&mut state).await
    }

    /// Replaces `stale`, a snapshot the network rejected.
    ///
    /// If the cache already holds a different fresh snapshot, some other
    /// caller refreshed it first and that snapshot is returned without a
    /// fetch.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the fetch fails.
    pub async fn refresh_stale(
        &self,
        stale: &BlockhashSnapshot,
    ) -> Result<BlockhashSnapshot, TransportError> {
        let mut state = self.state.lock().await;
        if let Some(cached) = state.as_ref()
            && cached.snapshot != *stale
            && cached.is_fresh(self.ttl)
        {
            return Ok(cached.snapshot);
        }
        self.fetch(&mut state).await
    }

    /// Returns the cached snapshot, fresh or not, without fetching.
    pub async fn cached(&self) -> Option<BlockhashSnapshot> {
        self.state.lock().await.map(|cached| cached.snapshot)
    }

    /// Drops the cached snapshot.
    pub async fn clear(&self) {
        *self.state.lock().await = None;
    }

    async fn fetch(
        &self,
        state: &mut Option<CachedBlockhash>,
    ) -> Result<BlockhashSnapshot, TransportError> {
        let snapshot = self.rpc.get_latest_blockhash().await?;
        #[cfg(feature = "telemetry")]
        tracing::debug!(
            blockhash = %snapshot.blockhash,
            last_valid_block_height = snapshot.last_valid_block_height,
            "Fetched latest blockhash"
        );
        *state = Some(CachedBlockhash {
            snapshot,
            fetched_at: Instant::now(),
        });
        Ok(snapshot)
    }
}
