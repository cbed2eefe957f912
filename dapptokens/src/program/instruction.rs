//! Transfer and query instructions of the `dapptokens` program.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::{Pubkey, pubkey};

use super::{ProgramDataError, deserialize, ensure_len, split_discriminator};
use crate::payment::ValidatedPayment;

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Associated Token Account program.
pub const ATA_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Discriminator of `transfer_tokens`.
pub const TRANSFER_TOKENS_DISCRIMINATOR: [u8; 8] = [54, 180, 238, 175, 74, 85, 126, 188];

/// Discriminator of `transfer_tokens_checked`.
pub const TRANSFER_TOKENS_CHECKED_DISCRIMINATOR: [u8; 8] = [5, 145, 13, 167, 254, 39, 93, 121];

/// Discriminator of `get_payment_info`.
pub const GET_PAYMENT_INFO_DISCRIMINATOR: [u8; 8] = [119, 81, 85, 203, 17, 100, 114, 46];

/// Which transfer entry point to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransferVariant {
    /// `transfer_tokens`: amount only.
    #[default]
    Unchecked,
    /// `transfer_tokens_checked`: amount plus decimals, verified against the
    /// mint on chain.
    Checked,
}

impl TransferVariant {
    /// The instruction discriminator.
    #[must_use]
    pub const fn discriminator(self) -> [u8; 8] {
        match self {
            Self::Unchecked => TRANSFER_TOKENS_DISCRIMINATOR,
            Self::Checked => TRANSFER_TOKENS_CHECKED_DISCRIMINATOR,
        }
    }

    /// The instruction name in the program's IDL.
    #[must_use]
    pub const fn instruction_name(self) -> &'static str {
        match self {
            Self::Unchecked => "transfer_tokens",
            Self::Checked => "transfer_tokens_checked",
        }
    }
}

/// Arguments of `transfer_tokens`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferTokensArgs {
    /// Amount in base units.
    pub amount: u64,
}

impl TransferTokensArgs {
    /// Encoded size, without the discriminator.
    pub const LEN: usize = 8;
}

/// Arguments of `transfer_tokens_checked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TransferTokensCheckedArgs {
    /// Amount in base units.
    pub amount: u64,
    /// Mint decimals.
    pub decimals: u8,
}

impl TransferTokensCheckedArgs {
    /// Encoded size, without the discriminator.
    pub const LEN: usize = 9;
}

/// Address of `wallet`'s associated token account for `mint`.
#[must_use]
pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (ata, _) = Pubkey::find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_ID,
    );
    ata
}

/// Builds the transfer instruction for a validated payment.
///
/// Accounts, in program order:
///
/// | # | Account                   | Signer | Writable |
/// |---|---------------------------|--------|----------|
/// | 0 | sender wallet             | yes    | no       |
/// | 1 | source token account      | no     | yes      |
/// | 2 | destination token account | no     | yes      |
/// | 3 | mint (checked only)       | no     | no       |
/// | 4 | recipient wallet          | no     | no       |
/// | 5 | SPL Token program         | no     | no       |
///
/// For [`TransferVariant::Checked`] the decimals byte is the mint's, which
/// validation already matched against the request's.
#[must_use]
pub fn build_transfer_instruction(
    payment: &ValidatedPayment,
    program_id: &Pubkey,
    variant: TransferVariant,
) -> Instruction {
    let request = payment.request();

    let mut accounts = Vec::with_capacity(6);
    accounts.push(AccountMeta::new_readonly(request.from_wallet(), true));
    accounts.push(AccountMeta::new(payment.source_token_account(), false));
    accounts.push(AccountMeta::new(payment.destination_token_account(), false));
    if variant == TransferVariant::Checked {
        accounts.push(AccountMeta::new_readonly(request.token_mint(), false));
    }
    accounts.push(AccountMeta::new_readonly(request.to_wallet(), false));
    accounts.push(AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false));

    let amount = request.amount();
    match variant {
        TransferVariant::Unchecked => Instruction::new_with_borsh(
            *program_id,
            &(TRANSFER_TOKENS_DISCRIMINATOR, TransferTokensArgs { amount }),
            accounts,
        ),
        TransferVariant::Checked => Instruction::new_with_borsh(
            *program_id,
            &(
                TRANSFER_TOKENS_CHECKED_DISCRIMINATOR,
                TransferTokensCheckedArgs {
                    amount,
                    decimals: payment.decimals(),
                },
            ),
            accounts,
        ),
    }
}

/// Builds a read-only `get_payment_info` query over two token accounts and
/// their mint. The program answers with [`PaymentInfo`](super::PaymentInfo)
/// return data.
#[must_use]
pub fn build_payment_info_instruction(
    program_id: &Pubkey,
    source_token_account: &Pubkey,
    destination_token_account: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*source_token_account, false),
            AccountMeta::new_readonly(*destination_token_account, false),
            AccountMeta::new_readonly(*mint, false),
        ],
        data: GET_PAYMENT_INFO_DISCRIMINATOR.to_vec(),
    }
}

/// Arguments of a decoded transfer instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferArgs {
    /// Which entry point the data targets.
    pub variant: TransferVariant,
    /// Amount in base units.
    pub amount: u64,
    /// Decimals, present for checked transfers only.
    pub decimals: Option<u8>,
}

/// Decodes transfer instruction data.
///
/// # Errors
///
/// Returns [`ProgramDataError::UnknownDiscriminator`] if the data does not
/// target a transfer entry point, or [`ProgramDataError::TooShort`] if the
/// arguments are truncated.
pub fn decode_transfer_instruction(data: &[u8]) -> Result<TransferArgs, ProgramDataError> {
    let (discriminator, body) = split_discriminator(data)?;
    match discriminator {
        TRANSFER_TOKENS_DISCRIMINATOR => {
            ensure_len(data, 8 + TransferTokensArgs::LEN)?;
            let args: TransferTokensArgs = deserialize(body)?;
            Ok(TransferArgs {
                variant: TransferVariant::Unchecked,
                amount: args.amount,
                decimals: None,
            })
        }
        TRANSFER_TOKENS_CHECKED_DISCRIMINATOR => {
            ensure_len(data, 8 + TransferTokensCheckedArgs::LEN)?;
            let args: TransferTokensCheckedArgs = deserialize(body)?;
            Ok(TransferArgs {
                variant: TransferVariant::Checked,
                amount: args.amount,
                decimals: Some(args.decimals),
            })
        }
        other => Err(ProgramDataError::UnknownDiscriminator(other)),
    }
}
