//! RPC transport used by the blockhash cache and the submitter.
//!
//! [`PaymentRpc`] is the narrow slice of the Solana JSON-RPC API the pipeline
//! needs. [`SolanaRpc`] (feature `rpc`) implements it on top of the
//! nonblocking `solana-client` RPC client and classifies its errors into
//! [`TransportError`], separating stale-blockhash rejections from everything
//! else.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

use super::types::BlockhashSnapshot;

#[cfg(feature = "rpc")]
use solana_client::client_error::ClientError;
#[cfg(feature = "rpc")]
use solana_client::nonblocking::rpc_client::RpcClient;
#[cfg(feature = "rpc")]
use solana_client::rpc_config::RpcSendTransactionConfig;
#[cfg(feature = "rpc")]
use solana_client::rpc_response::TransactionError;
#[cfg(feature = "rpc")]
use solana_commitment_config::{CommitmentConfig, CommitmentLevel};

/// Errors reported by an RPC transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The node does not know the transaction's blockhash (it expired or the
    /// node is behind).
    #[error("Blockhash not found")]
    BlockhashNotFound,
    /// The transaction was rejected in preflight or failed on chain.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    /// The transaction was not confirmed before its blockhash expired.
    #[error("Transaction not confirmed before block height {last_valid_block_height}")]
    ConfirmationExpired {
        /// Last block height at which the transaction could have landed.
        last_valid_block_height: u64,
    },
    /// The operation did not complete in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    /// Transport-level failure (connection, HTTP status, malformed response).
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl TransportError {
    /// Whether the node rejected the transaction for its blockhash.
    #[must_use]
    pub const fn is_stale_blockhash(&self) -> bool {
        matches!(self, Self::BlockhashNotFound)
    }
}

/// The JSON-RPC calls the payment pipeline depends on.
#[async_trait::async_trait]
pub trait PaymentRpc: Send + Sync {
    /// Fetches the latest blockhash and its last valid block height.
    async fn get_latest_blockhash(&self) -> Result<BlockhashSnapshot, TransportError>;

    /// Sends a signed transaction and returns its signature.
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TransportError>;

    /// Waits until `signature` reaches the configured commitment.
    ///
    /// `snapshot` is the blockhash the transaction was built with; once the
    /// chain passes its last valid block height the transaction can no longer
    /// land.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        snapshot: &BlockhashSnapshot,
    ) -> Result<(), TransportError>;
}

#[async_trait::async_trait]
impl<T: PaymentRpc + ?Sized> PaymentRpc for Arc<T> {
    async fn get_latest_blockhash(&self) -> Result<BlockhashSnapshot, TransportError> {
        (**self).get_latest_blockhash().await
    }

    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TransportError> {
        (**self).send_transaction(transaction).await
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        snapshot: &BlockhashSnapshot,
    ) -> Result<(), TransportError> {
        (**self).confirm_transaction(signature, snapshot).await
    }
}

/// Commitment level used for reads, preflight and confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Processed by the connected node.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted.
    Finalized,
}

#[cfg(feature = "rpc")]
impl From<Commitment> for CommitmentConfig {
    fn from(value: Commitment) -> Self {
        match value {
            Commitment::Processed => Self::processed(),
            Commitment::Confirmed => Self::confirmed(),
            Commitment::Finalized => Self::finalized(),
        }
    }
}

#[cfg(feature = "rpc")]
impl From<Commitment> for CommitmentLevel {
    fn from(value: Commitment) -> Self {
        CommitmentConfig::from(value).commitment
    }
}

/// Configuration for [`SolanaRpc`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcConfig {
    /// Commitment for reads, preflight and confirmation.
    /// Default: confirmed
    #[serde(default)]
    pub commitment: Commitment,

    /// Timeout for a single RPC request.
    /// Default: 30
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on the confirmation wait.
    /// Default: 60
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Delay between signature status polls.
    /// Default: 500
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Skip the node's preflight simulation.
    /// Default: false
    #[serde(default)]
    pub skip_preflight: bool,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_confirm_timeout_secs() -> u64 {
    60
}

const fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            commitment: Commitment::default(),
            request_timeout_secs: default_request_timeout_secs(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            skip_preflight: false,
        }
    }
}

impl RpcConfig {
    /// Timeout for a single RPC request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Upper bound on the confirmation wait.
    #[must_use]
    pub const fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    /// Delay between signature status polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// [`PaymentRpc`] backed by the nonblocking `solana-client` RPC client.
#[cfg(feature = "rpc")]
pub struct SolanaRpc {
    client: RpcClient,
    config: RpcConfig,
}

#[cfg(feature = "rpc")]
impl std::fmt::Debug for SolanaRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpc")
            .field("url", &self.client.url())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "rpc")]
impl SolanaRpc {
    /// Connects to the JSON-RPC endpoint at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, config: RpcConfig) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            url.into(),
            config.request_timeout(),
            config.commitment.into(),
        );
        Self { client, config }
    }

    /// Returns the underlying RPC client.
    #[must_use]
    pub const fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub(crate) fn commitment(&self) -> CommitmentConfig {
        self.config.commitment.into()
    }
}

/// Maps a `solana-client` error onto [`TransportError`].
///
/// Preflight failures and on-chain failures both carry a transaction error;
/// a `BlockhashNotFound` there is the only stale-blockhash signal.
#[cfg(feature = "rpc")]
#[must_use]
pub fn classify_client_error(err: &ClientError) -> TransportError {
    match err.get_transaction_error() {
        Some(TransactionError::BlockhashNotFound) => TransportError::BlockhashNotFound,
        Some(tx_err) => TransportError::TransactionFailed(tx_err.to_string()),
        None => TransportError::Rpc(err.to_string()),
    }
}

/// Fails once the chain has passed the snapshot's last valid block height.
///
/// A failed height read is not conclusive and leaves the transaction pending.
#[cfg(feature = "rpc")]
fn check_block_height(
    height: Result<u64, ClientError>,
    #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))] signature: &Signature,
    snapshot: &BlockhashSnapshot,
) -> Result<(), TransportError> {
    match height {
        Ok(height) if height > snapshot.last_valid_block_height => Err(
            TransportError::ConfirmationExpired {
                last_valid_block_height: snapshot.last_valid_block_height,
            },
        ),
        Ok(_) => Ok(()),
        Err(_e) => {
            #[cfg(feature = "telemetry")]
            tracing::debug!(%signature, error = %_e, "Block height poll failed");
            Ok(())
        }
    }
}

#[cfg(feature = "rpc")]
#[async_trait::async_trait]
impl PaymentRpc for SolanaRpc {
    async fn get_latest_blockhash(&self) -> Result<BlockhashSnapshot, TransportError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment())
            .await
            .map_err(|e| classify_client_error(&e))?;
        Ok(BlockhashSnapshot::new(blockhash, last_valid_block_height))
    }

    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TransportError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: self.config.skip_preflight,
            preflight_commitment: Some(self.config.commitment.into()),
            ..RpcSendTransactionConfig::default()
        };
        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| classify_client_error(&e))
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        snapshot: &BlockhashSnapshot,
    ) -> Result<(), TransportError> {
        let commitment = self.commitment();
        let timeout = self.config.confirm_timeout();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self
                .client
                .get_signature_status_with_commitment(signature, commitment)
                .await
            {
                Ok(Some(Ok(()))) => return Ok(()),
                Ok(Some(Err(tx_err))) => {
                    return Err(TransportError::TransactionFailed(tx_err.to_string()));
                }
                Ok(None) => {
                    let height = self.client.get_block_height_with_commitment(commitment).await;
                    check_block_height(height, signature, snapshot)?;
                }
                // Polls are retried until the deadline.
                Err(_e) => {
                    #[cfg(feature = "telemetry")]
                    tracing::debug!(%signature, error = %_e, "Signature status poll failed");
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(TransportError::Timeout(timeout));
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_config_defaults() {
        let config: RpcConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.confirm_timeout(), Duration::from_secs(60));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert!(!config.skip_preflight);
    }

    #[test]
    fn test_rpc_config_camel_case() {
        let config: RpcConfig = serde_json::from_str(
            r#"{"commitment":"finalized","confirmTimeoutSecs":5,"skipPreflight":true}"#,
        )
        .unwrap();
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.confirm_timeout(), Duration::from_secs(5));
        assert!(config.skip_preflight);
    }

    #[test]
    fn test_only_blockhash_not_found_is_stale() {
        assert!(TransportError::BlockhashNotFound.is_stale_blockhash());
        assert!(!TransportError::Rpc("connection reset".into()).is_stale_blockhash());
        assert!(
            !TransportError::ConfirmationExpired {
                last_valid_block_height: 10
            }
            .is_stale_blockhash()
        );
        assert!(!TransportError::Timeout(Duration::from_secs(1)).is_stale_blockhash());
    }

    #[cfg(feature = "rpc")]
    #[test]
    fn test_classify_transaction_errors() {
        use solana_client::client_error::ClientErrorKind;

        let stale = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::BlockhashNotFound,
        ));
        assert_eq!(classify_client_error(&stale), TransportError::BlockhashNotFound);

        let failed = ClientError::from(ClientErrorKind::TransactionError(
            TransactionError::InsufficientFundsForFee,
        ));
        assert!(matches!(
            classify_client_error(&failed),
            TransportError::TransactionFailed(_)
        ));

        let transport = ClientError::from(ClientErrorKind::Custom("boom".into()));
        assert!(matches!(
            classify_client_error(&transport),
            TransportError::Rpc(_)
        ));
    }

    #[cfg(feature = "rpc")]
    #[test]
    fn test_block_height_read_failure_keeps_polling() {
        use solana_client::client_error::ClientErrorKind;

        let signature = Signature::default();
        let snapshot = BlockhashSnapshot::new(solana_message::Hash::default(), 100);

        let unreachable = ClientError::from(ClientErrorKind::Custom("connection reset".into()));
        assert_eq!(
            check_block_height(Err(unreachable), &signature, &snapshot),
            Ok(())
        );
        assert_eq!(check_block_height(Ok(100), &signature, &snapshot), Ok(()));
        assert_eq!(
            check_block_height(Ok(101), &signature, &snapshot),
            Err(TransportError::ConfirmationExpired {
                last_valid_block_height: 100
            })
        );
    }
}
