//! `TokenTransferEvent` records emitted by the transfer instructions.
//!
//! Anchor's `emit!` writes each event as a `Program data: <base64>` log line.
//! The payload is the event discriminator followed by the Borsh fields.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use solana_pubkey::Pubkey;

use super::{ProgramDataError, deserialize, ensure_len, split_discriminator};

/// Discriminator of `TokenTransferEvent`.
pub const TOKEN_TRANSFER_EVENT_DISCRIMINATOR: [u8; 8] = [238, 159, 246, 89, 230, 8, 89, 117];

const PROGRAM_DATA_PREFIX: &str = "Program data: ";

/// A completed transfer, as reported by the program.
#[serde_as]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferEvent {
    /// Sending wallet.
    #[serde_as(as = "DisplayFromStr")]
    pub from: Pubkey,
    /// Receiving wallet.
    #[serde_as(as = "DisplayFromStr")]
    pub to: Pubkey,
    /// Mint of the transferred token.
    #[serde_as(as = "DisplayFromStr")]
    pub mint: Pubkey,
    /// Amount in base units.
    pub amount: u64,
    /// Cluster unix timestamp at execution.
    pub timestamp: i64,
}

impl TokenTransferEvent {
    /// Encoded size including the discriminator.
    pub const LEN: usize = 8 + 32 * 3 + 8 + 8;

    /// Decodes an event from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramDataError`] if the discriminator is wrong or the data
    /// is truncated.
    pub fn decode(data: &[u8]) -> Result<Self, ProgramDataError> {
        let (discriminator, body) = split_discriminator(data)?;
        if discriminator != TOKEN_TRANSFER_EVENT_DISCRIMINATOR {
            return Err(ProgramDataError::UnknownDiscriminator(discriminator));
        }
        ensure_len(data, Self::LEN)?;
        deserialize(body)
    }

    /// Encodes the event as the program would emit it.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramDataError::Borsh`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, ProgramDataError> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&TOKEN_TRANSFER_EVENT_DISCRIMINATOR);
        BorshSerialize::serialize(self, &mut data)?;
        Ok(data)
    }
}

/// Extracts every `TokenTransferEvent` from a transaction's log messages.
///
/// Lines that are not `Program data:` records, or that carry another event
/// type, are skipped.
///
/// # Errors
///
/// Returns [`ProgramDataError`] if a record is not valid base64, or if it
/// carries the transfer event discriminator but does not decode.
pub fn parse_transfer_events<S: AsRef<str>>(
    logs: &[S],
) -> Result<Vec<TokenTransferEvent>, ProgramDataError> {
    let mut events = Vec::new();
    for line in logs {
        let Some(encoded) = line.as_ref().strip_prefix(PROGRAM_DATA_PREFIX) else {
            continue;
        };
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ProgramDataError::Base64(e.to_string()))?;
        if !data.starts_with(&TOKEN_TRANSFER_EVENT_DISCRIMINATOR) {
            continue;
        }
        events.push(TokenTransferEvent::decode(&data)?);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn sample() -> TokenTransferEvent {
        TokenTransferEvent {
            from: Pubkey::new_unique(),
            to: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            amount: 1_000_000,
            timestamp: 1_735_689_600,
        }
    }

    #[test]
    fn test_event_discriminator_matches_anchor_derivation() {
        let hash = Sha256::digest(b"event:TokenTransferEvent");
        assert_eq!(TOKEN_TRANSFER_EVENT_DISCRIMINATOR.to_vec(), hash[..8].to_vec());
    }

    #[test]
    fn test_parse_events_from_logs() {
        let event = sample();
        let logs = vec![
            "Program JAVuBXeBZqXNtS73azhBDAoYaaAFfo4gWXoZe2e7Jf8H invoke [1]".to_owned(),
            "Program log: Instruction: TransferTokensChecked".to_owned(),
            format!("Program data: {}", STANDARD.encode(event.encode().unwrap())),
            format!("Program data: {}", STANDARD.encode([1u8; 16])),
            "Program JAVuBXeBZqXNtS73azhBDAoYaaAFfo4gWXoZe2e7Jf8H success".to_owned(),
        ];
        let events = parse_transfer_events(&logs).unwrap();
        assert_eq!(events, vec![event]);
    }

    #[test]
    fn test_truncated_event_is_an_error() {
        let mut data = sample().encode().unwrap();
        data.truncate(TokenTransferEvent::LEN - 1);
        let logs = [format!("Program data: {}", STANDARD.encode(&data))];
        assert!(matches!(
            parse_transfer_events(&logs),
            Err(ProgramDataError::TooShort { .. })
        ));
    }

    #[test]
    fn test_encoded_layout_is_discriminator_then_fields() {
        let event = sample();
        let data = event.encode().unwrap();
        assert_eq!(data.len(), TokenTransferEvent::LEN);
        assert_eq!(&data[..8], &TOKEN_TRANSFER_EVENT_DISCRIMINATOR);
        assert_eq!(&data[8..40], &event.from.to_bytes());
        assert_eq!(&data[104..112], &1_000_000u64.to_le_bytes());
        assert_eq!(&data[112..], &1_735_689_600i64.to_le_bytes());
        assert_eq!(TokenTransferEvent::decode(&data).unwrap(), event);
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let logs = ["Program data: !!!"];
        assert!(matches!(
            parse_transfer_events(&logs),
            Err(ProgramDataError::Base64(_))
        ));
    }
}
