use std::fmt;

use solana_signature::Signature;

use crate::chain::{SignerError, TransportError};

/// Step of a submission at which a network failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionStage {
    /// Fetching a blockhash.
    Blockhash,
    /// Sending the signed transaction.
    Send,
    /// Waiting for confirmation.
    Confirm,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blockhash => "blockhash",
            Self::Send => "send",
            Self::Confirm => "confirm",
        })
    }
}

/// Terminal outcome of a failed submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The network rejected the blockhash on both attempts.
    #[error("Blockhash rejected as stale after retry")]
    StaleBlockhash,
    /// The signer declined or failed to sign.
    #[error(transparent)]
    SigningRejected(#[from] SignerError),
    /// A network call failed.
    ///
    /// When `signature` is set the transaction was sent and may still land;
    /// callers should reconcile by looking the signature up.
    #[error("Network failure during {stage}: {source}")]
    NetworkFailure {
        /// Where the failure happened.
        stage: SubmissionStage,
        /// Signature of the sent transaction, if sending succeeded.
        signature: Option<Signature>,
        /// The transport error.
        source: TransportError,
    },
    /// The transaction could not be assembled.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

impl SubmissionError {
    /// Signature of a transaction that was sent but not confirmed.
    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        match self {
            Self::NetworkFailure {
                signature: Some(signature),
                ..
            } => Some(signature),
            _ => None,
        }
    }
}
