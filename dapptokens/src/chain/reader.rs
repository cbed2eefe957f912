//! Chain-state reads feeding the payment validator.

use solana_pubkey::Pubkey;

use super::rpc::TransportError;
use crate::payment::{PaymentContext, PaymentRequest};

#[cfg(feature = "rpc")]
use solana_account::Account;
#[cfg(feature = "rpc")]
use spl_token::solana_program::program_pack::Pack;

#[cfg(feature = "rpc")]
use super::rpc::{SolanaRpc, classify_client_error};
#[cfg(feature = "rpc")]
use super::types::TokenAccountState;
#[cfg(feature = "rpc")]
use crate::program::{TOKEN_PROGRAM_ID, associated_token_address};

/// Errors reading the accounts a payment touches.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),
    /// The account exists but is not what the payment expects.
    #[error("Invalid account data for {address}: {reason}")]
    InvalidAccountData {
        /// The offending account.
        address: Pubkey,
        /// What was wrong with it.
        reason: String,
    },
    /// The RPC call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Supplies the validator with the chain facts about a payment.
///
/// Implementations query fresh state for every call; the result is a snapshot
/// and may be stale by the time the transaction lands.
#[async_trait::async_trait]
pub trait ChainStateReader: Send + Sync {
    /// Reads the source and destination token accounts and the mint decimals
    /// for `request`.
    async fn payment_context(&self, request: &PaymentRequest)
    -> Result<PaymentContext, ReaderError>;
}

#[async_trait::async_trait]
impl<T: ChainStateReader + ?Sized> ChainStateReader for std::sync::Arc<T> {
    async fn payment_context(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentContext, ReaderError> {
        (**self).payment_context(request).await
    }
}

/// Unpacks an SPL Token account owned by the classic Token program.
///
/// # Errors
///
/// Returns [`ReaderError::InvalidAccountData`] if the account is owned by
/// another program or does not hold an initialized token account.
#[cfg(feature = "rpc")]
pub fn unpack_token_account(
    address: Pubkey,
    account: &Account,
) -> Result<TokenAccountState, ReaderError> {
    if account.owner != TOKEN_PROGRAM_ID {
        return Err(ReaderError::InvalidAccountData {
            address,
            reason: format!("owned by {}, not the token program", account.owner),
        });
    }
    let state = spl_token::state::Account::unpack(&account.data).map_err(|e| {
        ReaderError::InvalidAccountData {
            address,
            reason: format!("failed to unpack token account: {e}"),
        }
    })?;
    Ok(TokenAccountState {
        address,
        mint: state.mint,
        owner: state.owner,
        amount: state.amount,
    })
}

/// Unpacks an SPL Token mint and returns its decimals.
///
/// # Errors
///
/// Returns [`ReaderError::InvalidAccountData`] if the account is not an
/// initialized mint of the classic Token program.
#[cfg(feature = "rpc")]
pub fn unpack_mint_decimals(address: Pubkey, account: &Account) -> Result<u8, ReaderError> {
    if account.owner != TOKEN_PROGRAM_ID {
        return Err(ReaderError::InvalidAccountData {
            address,
            reason: format!("owned by {}, not the token program", account.owner),
        });
    }
    let mint = spl_token::state::Mint::unpack(&account.data).map_err(|e| {
        ReaderError::InvalidAccountData {
            address,
            reason: format!("failed to unpack mint: {e}"),
        }
    })?;
    Ok(mint.decimals)
}

#[cfg(feature = "rpc")]
#[async_trait::async_trait]
impl ChainStateReader for SolanaRpc {
    async fn payment_context(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentContext, ReaderError> {
        let mint = request.token_mint();
        let source = associated_token_address(&request.from_wallet(), &mint);
        let destination = associated_token_address(&request.to_wallet(), &mint);
        let accounts = self
            .client()
            .get_multiple_accounts_with_commitment(&[source, destination, mint], self.commitment())
            .await
            .map_err(|e| classify_client_error(&e))?
            .value;

        let fetched = |index: usize, address: Pubkey| {
            accounts
                .get(index)
                .and_then(Option::as_ref)
                .ok_or(ReaderError::AccountNotFound(address))
        };
        let source = unpack_token_account(source, fetched(0, source)?)?;
        let destination = unpack_token_account(destination, fetched(1, destination)?)?;
        let mint_decimals = unpack_mint_decimals(mint, fetched(2, mint)?)?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            source = %source.address,
            destination = %destination.address,
            balance = source.amount,
            mint_decimals,
            "Fetched payment context"
        );

        Ok(PaymentContext {
            source,
            destination,
            mint_decimals,
        })
    }
}

#[cfg(all(test, feature = "rpc"))]
mod tests {
    use super::*;
    use spl_token::solana_program::program_option::COption;
    use spl_token::state::AccountState;

    fn token_account(mint: Pubkey, owner: Pubkey, amount: u64) -> Account {
        let state = spl_token::state::Account {
            mint,
            owner,
            amount,
            delegate: COption::None,
            state: AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: 0,
            close_authority: COption::None,
        };
        let mut data = vec![0u8; spl_token::state::Account::LEN];
        spl_token::state::Account::pack(state, &mut data).unwrap();
        Account {
            lamports: 2_039_280,
            data,
            owner: TOKEN_PROGRAM_ID,
            executable: false,
            rent_epoch: 0,
        }
    }

    #[test]
    fn test_unpack_token_account() {
        let address = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let state = unpack_token_account(address, &token_account(mint, owner, 42)).unwrap();
        assert_eq!(state.address, address);
        assert_eq!(state.mint, mint);
        assert_eq!(state.owner, owner);
        assert_eq!(state.amount, 42);
    }

    #[test]
    fn test_unpack_rejects_foreign_owner() {
        let mut account = token_account(Pubkey::new_unique(), Pubkey::new_unique(), 1);
        account.owner = Pubkey::new_unique();
        let err = unpack_token_account(Pubkey::new_unique(), &account).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidAccountData { .. }));
    }

    #[test]
    fn test_unpack_mint_rejects_token_account_data() {
        let account = token_account(Pubkey::new_unique(), Pubkey::new_unique(), 1);
        let err = unpack_mint_decimals(Pubkey::new_unique(), &account).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidAccountData { .. }));
    }
}
