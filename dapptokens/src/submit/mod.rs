//! Transaction assembly, signing, sending and confirmation.
//!
//! [`TransactionSubmitter::submit`] runs one payment instruction through
//!
//! 1. a blockhash from the shared [`BlockhashCache`]
//! 2. a fresh [`PreparedTransaction`]
//! 3. the wallet signer
//! 4. send
//! 5. confirmation
//!
//! and returns a single outcome. A send rejected for its blockhash is
//! re-prepared with a refreshed blockhash and re-signed exactly once. Nothing
//! else is retried; in particular a transaction that was sent but not
//! confirmed in time is reported with its signature, since it may still land.

mod config;
mod error;
mod prepared;

use std::sync::Arc;

use solana_instruction::Instruction;
use solana_signature::Signature;

pub use config::{MessageVersion, SubmitterConfig};
pub use error::{SubmissionError, SubmissionStage};
pub use prepared::PreparedTransaction;

use crate::blockhash::BlockhashCache;
use crate::chain::{
    BlockhashSnapshot, PaymentRpc, SignerError, TransportError, WalletSigner, is_fully_signed,
};

/// A confirmed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Signature of the confirmed transaction.
    pub signature: Signature,
    /// The blockhash the confirmed transaction referenced.
    pub blockhash: BlockhashSnapshot,
    /// Whether the stale-blockhash retry was taken.
    pub retried: bool,
}

/// Signs, sends and confirms payment instructions.
///
/// Submissions are independent and may run concurrently; they share only the
/// blockhash cache.
#[derive(Debug)]
pub struct TransactionSubmitter<R> {
    cache: Arc<BlockhashCache<R>>,
    config: SubmitterConfig,
}

impl<R: PaymentRpc> TransactionSubmitter<R> {
    /// Creates a submitter with its own blockhash cache.
    pub fn new(rpc: R, config: SubmitterConfig) -> Self {
        let cache = Arc::new(BlockhashCache::new(rpc, config.blockhash_ttl()));
        Self { cache, config }
    }

    /// Creates a submitter drawing blockhashes from an existing cache.
    ///
    /// `config.blockhash_ttl_secs` is ignored; the cache keeps its own window.
    pub const fn with_cache(cache: Arc<BlockhashCache<R>>, config: SubmitterConfig) -> Self {
        Self { cache, config }
    }

    /// Returns the shared blockhash cache.
    pub const fn blockhash_cache(&self) -> &Arc<BlockhashCache<R>> {
        &self.cache
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    /// Submits `instruction` with `signer` as fee payer and waits for
    /// confirmation.
    ///
    /// Dropping the returned future abandons the submission. A transaction
    /// already sent may still land.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::StaleBlockhash`] if the blockhash was rejected
    ///   twice
    /// - [`SubmissionError::SigningRejected`] if the signer refused or
    ///   returned an incompletely signed transaction
    /// - [`SubmissionError::NetworkFailure`] for any other network failure,
    ///   carrying the signature once the transaction was sent
    /// - [`SubmissionError::InvalidTransaction`] if the message cannot be
    ///   compiled
    pub async fn submit<S>(
        &self,
        instruction: Instruction,
        signer: &S,
    ) -> Result<SubmissionResult, SubmissionError>
    where
        S: WalletSigner + ?Sized,
    {
        let fee_payer = signer.pubkey();
        let rpc = self.cache.rpc();
        let mut snapshot = self
            .cache
            .get_current_blockhash()
            .await
            .map_err(|e| network_failure(SubmissionStage::Blockhash, None, e))?;
        let mut retried = false;

        let signature = loop {
            let prepared = PreparedTransaction::new(instruction.clone(), fee_payer, snapshot)
                .with_version(self.config.message_version);
            let unsigned = prepared.to_unsigned()?;
            let signed = signer.sign_transaction(unsigned).await?;
            if !is_fully_signed(&signed) {
                return Err(SignerError::Failed("transaction is missing signatures".into()).into());
            }

            match rpc.send_transaction(&signed).await {
                Ok(signature) => break signature,
                Err(e) if e.is_stale_blockhash() && !retried => {
                    #[cfg(feature = "telemetry")]
                    tracing::warn!(
                        blockhash = %snapshot.blockhash,
                        "Blockhash rejected as stale, retrying with a fresh one"
                    );
                    retried = true;
                    snapshot = self
                        .cache
                        .refresh_stale(&snapshot)
                        .await
                        .map_err(|e| network_failure(SubmissionStage::Blockhash, None, e))?;
                }
                Err(e) if e.is_stale_blockhash() => return Err(SubmissionError::StaleBlockhash),
                Err(e) => return Err(network_failure(SubmissionStage::Send, None, e)),
            }
        };

        rpc.confirm_transaction(&signature, &snapshot)
            .await
            .map_err(|e| network_failure(SubmissionStage::Confirm, Some(signature), e))?;

        #[cfg(feature = "telemetry")]
        tracing::info!(%signature, %fee_payer, retried, "Transaction confirmed");

        Ok(SubmissionResult {
            signature,
            blockhash: snapshot,
            retried,
        })
    }
}

const fn network_failure(
    stage: SubmissionStage,
    signature: Option<Signature>,
    source: TransportError,
) -> SubmissionError {
    SubmissionError::NetworkFailure {
        stage,
        signature,
        source,
    }
}
