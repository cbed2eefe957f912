//! Binary interface of the `dapptokens` program.
//!
//! - [`instruction`] - `transfer_tokens`, `transfer_tokens_checked` and
//!   `get_payment_info` instruction layouts
//! - [`events`] - `TokenTransferEvent` records from transaction logs
//! - [`info`] - `PaymentInfo` return data
//!
//! The program is built with Anchor: every instruction and event starts with
//! an 8-byte discriminator followed by little-endian Borsh fields.

use borsh::BorshDeserialize;

pub mod events;
pub mod info;
pub mod instruction;

pub use events::{TokenTransferEvent, parse_transfer_events};
pub use info::PaymentInfo;
pub use instruction::*;

/// Errors decoding data produced by or destined for the program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramDataError {
    /// The data is shorter than its layout.
    #[error("Expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Bytes the layout needs.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The leading discriminator is not one this crate knows.
    #[error("Unknown discriminator {0:?}")]
    UnknownDiscriminator([u8; 8]),
    /// The fields do not deserialize, for example a boolean that is neither
    /// 0 nor 1.
    #[error("Invalid Borsh data: {0}")]
    Borsh(String),
    /// A log record is not valid base64.
    #[error("Invalid base64: {0}")]
    Base64(String),
}

impl From<std::io::Error> for ProgramDataError {
    fn from(err: std::io::Error) -> Self {
        Self::Borsh(err.to_string())
    }
}

pub(crate) const fn ensure_len(data: &[u8], expected: usize) -> Result<(), ProgramDataError> {
    if data.len() < expected {
        return Err(ProgramDataError::TooShort {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Splits Anchor data into its discriminator and Borsh body.
pub(crate) fn split_discriminator(data: &[u8]) -> Result<([u8; 8], &[u8]), ProgramDataError> {
    let (discriminator, body) = data
        .split_first_chunk::<8>()
        .ok_or(ProgramDataError::TooShort {
            expected: 8,
            actual: data.len(),
        })?;
    Ok((*discriminator, body))
}

/// Deserializes a Borsh body, ignoring trailing bytes.
pub(crate) fn deserialize<T: BorshDeserialize>(mut body: &[u8]) -> Result<T, ProgramDataError> {
    Ok(T::deserialize(&mut body)?)
}
