//! Return data of `get_payment_info`.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use solana_pubkey::Pubkey;

use super::{ProgramDataError, deserialize, ensure_len};

/// Balances and mint facts for a prospective transfer, computed on chain.
#[serde_as]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Source token account balance.
    pub from_balance: u64,
    /// Destination token account balance.
    pub to_balance: u64,
    /// The mint passed to the query.
    #[serde_as(as = "DisplayFromStr")]
    pub mint: Pubkey,
    /// Decimals of that mint.
    pub decimals: u8,
    /// Whether both token accounts hold that mint.
    pub is_valid_transfer: bool,
}

impl PaymentInfo {
    /// Encoded size of the return data.
    pub const LEN: usize = 8 + 8 + 32 + 1 + 1;

    /// Decodes the return data of a `get_payment_info` call.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramDataError`] if the data is truncated or the boolean
    /// flag is neither 0 nor 1.
    pub fn decode(data: &[u8]) -> Result<Self, ProgramDataError> {
        ensure_len(data, Self::LEN)?;
        deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(mint: &Pubkey, flag: u8) -> Vec<u8> {
        let mut data = Vec::with_capacity(PaymentInfo::LEN);
        data.extend_from_slice(&2_000_000u64.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(mint.as_ref());
        data.push(6);
        data.push(flag);
        data
    }

    #[test]
    fn test_decode_payment_info() {
        let mint = Pubkey::new_unique();
        let info = PaymentInfo::decode(&encoded(&mint, 1)).unwrap();
        assert_eq!(
            info,
            PaymentInfo {
                from_balance: 2_000_000,
                to_balance: 0,
                mint,
                decimals: 6,
                is_valid_transfer: true,
            }
        );
        assert_eq!(borsh::to_vec(&info).unwrap(), encoded(&mint, 1));
    }

    #[test]
    fn test_decode_rejects_bad_flag_and_truncation() {
        let mint = Pubkey::new_unique();
        assert!(matches!(
            PaymentInfo::decode(&encoded(&mint, 2)),
            Err(ProgramDataError::Borsh(_))
        ));
        let data = encoded(&mint, 0);
        assert!(matches!(
            PaymentInfo::decode(&data[..PaymentInfo::LEN - 1]),
            Err(ProgramDataError::TooShort { .. })
        ));
    }
}
