//! Crate-level error type.

use std::fmt;

use crate::chain::ReaderError;
use crate::payment::PaymentError;
use crate::submit::SubmissionError;

/// Coarse classification of every failure the payment flow can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Amount is zero.
    InvalidAmount,
    /// Sender balance is below the amount.
    InsufficientFunds,
    /// Token accounts and request disagree on the mint.
    MintMismatch,
    /// Signer does not own the source token account.
    InvalidOwner,
    /// Checked transfer decimals differ from the mint.
    InvalidDecimals,
    /// Blockhash rejected even after a refresh.
    StaleBlockhash,
    /// Signer declined or failed.
    SigningRejected,
    /// Any RPC, chain-state or transaction assembly failure.
    NetworkFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidAmount => "InvalidAmount",
            Self::InsufficientFunds => "InsufficientFunds",
            Self::MintMismatch => "MintMismatch",
            Self::InvalidOwner => "InvalidOwner",
            Self::InvalidDecimals => "InvalidDecimals",
            Self::StaleBlockhash => "StaleBlockhash",
            Self::SigningRejected => "SigningRejected",
            Self::NetworkFailure => "NetworkFailure",
        })
    }
}

/// Any failure of [`PaymentClient`](crate::PaymentClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request failed validation.
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// Reading the accounts the payment touches failed.
    #[error(transparent)]
    ChainState(#[from] ReaderError),
    /// Submitting the transaction failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl PaymentError {
    /// The error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount => ErrorKind::InvalidAmount,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::MintMismatch { .. } => ErrorKind::MintMismatch,
            Self::InvalidOwner { .. } => ErrorKind::InvalidOwner,
            Self::InvalidDecimals { .. } => ErrorKind::InvalidDecimals,
        }
    }
}

impl SubmissionError {
    /// The error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StaleBlockhash => ErrorKind::StaleBlockhash,
            Self::SigningRejected(_) => ErrorKind::SigningRejected,
            Self::NetworkFailure { .. } | Self::InvalidTransaction(_) => ErrorKind::NetworkFailure,
        }
    }
}

impl Error {
    /// The error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Payment(e) => e.kind(),
            Self::ChainState(_) => ErrorKind::NetworkFailure,
            Self::Submission(e) => e.kind(),
        }
    }
}
