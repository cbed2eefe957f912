//! Plain chain-state values shared by the pipeline stages.

use solana_message::Hash;
use solana_pubkey::Pubkey;

/// A recent blockhash together with the last block height at which
/// transactions referencing it are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockhashSnapshot {
    /// The blockhash.
    pub blockhash: Hash,
    /// Last block height at which the blockhash is valid.
    pub last_valid_block_height: u64,
}

impl BlockhashSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }
}

/// The fields of an SPL token account the validator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountState {
    /// Address of the token account.
    pub address: Pubkey,
    /// Mint the account holds.
    pub mint: Pubkey,
    /// Wallet that owns the account.
    pub owner: Pubkey,
    /// Balance in the mint's smallest unit.
    pub amount: u64,
}
