use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use solana_pubkey::Pubkey;

use crate::program::TransferVariant;

/// A user's request to move tokens from their wallet to another wallet.
///
/// Immutable once built. Addresses are wallets, not token accounts; the token
/// accounts are the wallets' associated token accounts for `token_mint`.
///
/// Serialized as camelCase JSON with base58 addresses:
///
/// ```json
/// {"fromWallet":"…","toWallet":"…","tokenMint":"…","amount":1000000,"decimals":6}
/// ```
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde_as(as = "DisplayFromStr")]
    from_wallet: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    to_wallet: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    token_mint: Pubkey,
    amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decimals: Option<u8>,
}

impl PaymentRequest {
    /// Creates an unchecked-transfer request for `amount` base units.
    #[must_use]
    pub const fn new(from_wallet: Pubkey, to_wallet: Pubkey, token_mint: Pubkey, amount: u64) -> Self {
        Self {
            from_wallet,
            to_wallet,
            token_mint,
            amount,
            decimals: None,
        }
    }

    /// Turns the request into a checked transfer asserting `decimals`.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Sending wallet; signs the transfer and owns the source token account.
    #[must_use]
    pub const fn from_wallet(&self) -> Pubkey {
        self.from_wallet
    }

    /// Receiving wallet.
    #[must_use]
    pub const fn to_wallet(&self) -> Pubkey {
        self.to_wallet
    }

    /// Mint of the token being moved.
    #[must_use]
    pub const fn token_mint(&self) -> Pubkey {
        self.token_mint
    }

    /// Amount in the mint's smallest unit.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Decimals asserted by a checked transfer.
    #[must_use]
    pub const fn decimals(&self) -> Option<u8> {
        self.decimals
    }

    /// [`TransferVariant::Checked`] when the request asserts decimals.
    #[must_use]
    pub const fn variant(&self) -> TransferVariant {
        if self.decimals.is_some() {
            TransferVariant::Checked
        } else {
            TransferVariant::Unchecked
        }
    }
}
