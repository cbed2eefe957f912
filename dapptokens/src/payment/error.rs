use solana_pubkey::Pubkey;

/// Reasons a payment request is rejected before anything is sent.
///
/// Variants mirror the program's own `PaymentError` codes, so a request that
/// passes here is not expected to fail those checks on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// The amount is zero.
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    /// The source token account holds less than the amount.
    #[error("Insufficient funds: balance {balance} is below amount {amount}")]
    InsufficientFunds {
        /// Source token account balance.
        balance: u64,
        /// Requested amount.
        amount: u64,
    },
    /// Source, destination and requested mint disagree.
    #[error(
        "Mint mismatch: source holds {source_mint}, destination holds {destination_mint}, request names {requested_mint}"
    )]
    MintMismatch {
        /// Mint of the source token account.
        source_mint: Pubkey,
        /// Mint of the destination token account.
        destination_mint: Pubkey,
        /// Mint named in the request.
        requested_mint: Pubkey,
    },
    /// The signer does not own the source token account.
    #[error("Invalid owner: source account is owned by {owner}, not signer {signer}")]
    InvalidOwner {
        /// Recorded owner of the source token account.
        owner: Pubkey,
        /// The signing wallet.
        signer: Pubkey,
    },
    /// The request's decimals differ from the mint's.
    #[error("Invalid decimals: mint has {expected}, request has {actual}")]
    InvalidDecimals {
        /// Decimals registered on the mint.
        expected: u8,
        /// Decimals supplied in the request.
        actual: u8,
    },
}
