use solana_pubkey::Pubkey;

use super::error::PaymentError;
use super::request::PaymentRequest;
use crate::chain::TokenAccountState;
use crate::program::TransferVariant;

/// Chain facts a payment is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentContext {
    /// The sender's token account for the request's mint.
    pub source: TokenAccountState,
    /// The recipient's token account for the request's mint.
    pub destination: TokenAccountState,
    /// Decimals registered on the mint.
    pub mint_decimals: u8,
}

/// Result of [`validate`].
pub type ValidationOutcome = Result<ValidatedPayment, PaymentError>;

/// A payment request that passed every validation rule.
///
/// Only [`validate`] constructs this type, so holding one proves the rules
/// were checked against the context it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPayment {
    request: PaymentRequest,
    source_token_account: Pubkey,
    destination_token_account: Pubkey,
    decimals: u8,
}

impl ValidatedPayment {
    /// The request that was validated.
    #[must_use]
    pub const fn request(&self) -> &PaymentRequest {
        &self.request
    }

    /// The sender's token account.
    #[must_use]
    pub const fn source_token_account(&self) -> Pubkey {
        self.source_token_account
    }

    /// The recipient's token account.
    #[must_use]
    pub const fn destination_token_account(&self) -> Pubkey {
        self.destination_token_account
    }

    /// Mint decimals; equal to the request's decimals when it carried any.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The transfer variant the request asks for.
    #[must_use]
    pub const fn variant(&self) -> TransferVariant {
        self.request.variant()
    }
}

/// Rejects a zero amount.
///
/// This is the one rule that needs no chain state, so callers can apply it
/// before reading any accounts.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidAmount`] if the amount is zero.
pub const fn validate_amount(request: &PaymentRequest) -> Result<(), PaymentError> {
    if request.amount() == 0 {
        return Err(PaymentError::InvalidAmount);
    }
    Ok(())
}

/// Checks `request` against `context`.
///
/// Rules run in a fixed order and the first failure is returned:
///
/// 1. amount is positive
/// 2. the source balance covers the amount
/// 3. source, destination and requested mint agree
/// 4. the sender owns the source token account
/// 5. for checked transfers, the decimals match the mint
///
/// # Errors
///
/// Returns the [`PaymentError`] of the first rule that fails.
pub fn validate(request: &PaymentRequest, context: &PaymentContext) -> ValidationOutcome {
    let PaymentContext {
        source,
        destination,
        mint_decimals,
    } = context;

    validate_amount(request)?;

    if source.amount < request.amount() {
        return Err(PaymentError::InsufficientFunds {
            balance: source.amount,
            amount: request.amount(),
        });
    }

    let mint = request.token_mint();
    if source.mint != mint || destination.mint != mint {
        return Err(PaymentError::MintMismatch {
            source_mint: source.mint,
            destination_mint: destination.mint,
            requested_mint: mint,
        });
    }

    if source.owner != request.from_wallet() {
        return Err(PaymentError::InvalidOwner {
            owner: source.owner,
            signer: request.from_wallet(),
        });
    }

    if let Some(decimals) = request.decimals()
        && decimals != *mint_decimals
    {
        return Err(PaymentError::InvalidDecimals {
            expected: *mint_decimals,
            actual: decimals,
        });
    }

    Ok(ValidatedPayment {
        request: *request,
        source_token_account: source.address,
        destination_token_account: destination.address,
        decimals: *mint_decimals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        from: Pubkey,
        to: Pubkey,
        mint: Pubkey,
        context: PaymentContext,
    }

    fn fixture(balance: u64) -> Fixture {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let context = PaymentContext {
            source: TokenAccountState {
                address: Pubkey::new_unique(),
                mint,
                owner: from,
                amount: balance,
            },
            destination: TokenAccountState {
                address: Pubkey::new_unique(),
                mint,
                owner: to,
                amount: 0,
            },
            mint_decimals: 6,
        };
        Fixture {
            from,
            to,
            mint,
            context,
        }
    }

    #[test]
    fn test_valid_checked_payment() {
        let f = fixture(2_000_000);
        let request = PaymentRequest::new(f.from, f.to, f.mint, 1_000_000).with_decimals(6);
        let payment = validate(&request, &f.context).unwrap();
        assert_eq!(payment.request(), &request);
        assert_eq!(payment.source_token_account(), f.context.source.address);
        assert_eq!(
            payment.destination_token_account(),
            f.context.destination.address
        );
        assert_eq!(payment.decimals(), 6);
        assert_eq!(payment.variant(), TransferVariant::Checked);
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let f = fixture(2_000_000);
        let request = PaymentRequest::new(f.from, f.to, f.mint, 0);
        assert_eq!(validate_amount(&request), Err(PaymentError::InvalidAmount));
        assert_eq!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidAmount)
        );
    }

    #[test]
    fn test_balance_equal_to_amount_is_enough() {
        let f = fixture(500);
        let request = PaymentRequest::new(f.from, f.to, f.mint, 500);
        assert!(validate(&request, &f.context).is_ok());
    }

    #[test]
    fn test_insufficient_funds() {
        let f = fixture(499);
        let request = PaymentRequest::new(f.from, f.to, f.mint, 500);
        assert_eq!(
            validate(&request, &f.context),
            Err(PaymentError::InsufficientFunds {
                balance: 499,
                amount: 500
            })
        );
    }

    #[test]
    fn test_destination_mint_mismatch() {
        let mut f = fixture(1_000);
        f.context.destination.mint = Pubkey::new_unique();
        let request = PaymentRequest::new(f.from, f.to, f.mint, 10);
        assert!(matches!(
            validate(&request, &f.context),
            Err(PaymentError::MintMismatch { .. })
        ));
    }

    #[test]
    fn test_requested_mint_mismatch() {
        let f = fixture(1_000);
        let request = PaymentRequest::new(f.from, f.to, Pubkey::new_unique(), 10);
        let err = validate(&request, &f.context).unwrap_err();
        assert_eq!(
            err,
            PaymentError::MintMismatch {
                source_mint: f.mint,
                destination_mint: f.mint,
                requested_mint: request.token_mint(),
            }
        );
    }

    #[test]
    fn test_source_owned_by_someone_else() {
        let mut f = fixture(1_000);
        let thief = Pubkey::new_unique();
        f.context.source.owner = thief;
        let request = PaymentRequest::new(f.from, f.to, f.mint, 10);
        assert_eq!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidOwner {
                owner: thief,
                signer: f.from
            })
        );
    }

    #[test]
    fn test_checked_decimals_mismatch() {
        let f = fixture(1_000);
        let request = PaymentRequest::new(f.from, f.to, f.mint, 10).with_decimals(9);
        assert_eq!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidDecimals {
                expected: 6,
                actual: 9
            })
        );
    }

    #[test]
    fn test_unchecked_ignores_decimals() {
        let mut f = fixture(1_000);
        f.context.mint_decimals = 0;
        let request = PaymentRequest::new(f.from, f.to, f.mint, 10);
        let payment = validate(&request, &f.context).unwrap();
        assert_eq!(payment.variant(), TransferVariant::Unchecked);
        assert_eq!(payment.decimals(), 0);
    }

    #[test]
    fn test_zero_amount_wins_over_mint_mismatch() {
        let mut f = fixture(0);
        f.context.destination.mint = Pubkey::new_unique();
        f.context.source.owner = Pubkey::new_unique();
        f.context.mint_decimals = 9;
        let request = PaymentRequest::new(f.from, f.to, f.mint, 0).with_decimals(6);
        assert_eq!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidAmount)
        );
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut f = fixture(5);
        f.context.source.owner = Pubkey::new_unique();
        f.context.destination.mint = Pubkey::new_unique();
        let request = PaymentRequest::new(f.from, f.to, f.mint, 10).with_decimals(2);
        assert!(matches!(
            validate(&request, &f.context),
            Err(PaymentError::InsufficientFunds { .. })
        ));

        f.context.source.amount = 10;
        assert!(matches!(
            validate(&request, &f.context),
            Err(PaymentError::MintMismatch { .. })
        ));

        f.context.destination.mint = f.mint;
        assert!(matches!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidOwner { .. })
        ));

        f.context.source.owner = f.from;
        assert!(matches!(
            validate(&request, &f.context),
            Err(PaymentError::InvalidDecimals { .. })
        ));
    }
}
