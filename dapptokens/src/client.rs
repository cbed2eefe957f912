//! End-to-end payment flow.

use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use crate::chain::{ChainStateReader, PaymentRpc, WalletSigner};
use crate::error::Error;
use crate::networks::{SolanaNetwork, resolve_program_address};
use crate::payment::{PaymentError, PaymentRequest, ValidatedPayment, validate, validate_amount};
use crate::program::build_transfer_instruction;
use crate::submit::{SubmissionResult, TransactionSubmitter};

/// Validates, builds and submits payments against one network's program
/// deployment.
#[derive(Debug)]
pub struct PaymentClient<R, C> {
    network: SolanaNetwork,
    program_id: Pubkey,
    reader: R,
    submitter: TransactionSubmitter<C>,
}

impl<R, C> PaymentClient<R, C>
where
    R: ChainStateReader,
    C: PaymentRpc,
{
    /// Creates a client for `network`, resolving its program address once.
    pub fn new(network: SolanaNetwork, reader: R, submitter: TransactionSubmitter<C>) -> Self {
        let program_id = resolve_program_address(network);
        #[cfg(feature = "telemetry")]
        tracing::debug!(%network, %program_id, "Resolved program deployment");
        Self {
            network,
            program_id,
            reader,
            submitter,
        }
    }

    /// The network this client targets.
    pub const fn network(&self) -> SolanaNetwork {
        self.network
    }

    /// The program address transfers are sent to.
    pub const fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// The chain-state reader.
    pub const fn reader(&self) -> &R {
        &self.reader
    }

    /// The transaction submitter.
    pub const fn submitter(&self) -> &TransactionSubmitter<C> {
        &self.submitter
    }

    /// Validates `request` against current chain state.
    ///
    /// A zero amount is rejected before any account is read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payment`] if a validation rule fails, or
    /// [`Error::ChainState`] if the accounts cannot be read.
    pub async fn check(&self, request: &PaymentRequest) -> Result<ValidatedPayment, Error> {
        validate_amount(request)?;
        let context = self.reader.payment_context(request).await?;
        let payment = validate(request, &context)?;
        Ok(payment)
    }

    /// Builds the transfer instruction for a validated payment, using the
    /// variant the request asks for.
    #[must_use]
    pub fn instruction(&self, payment: &ValidatedPayment) -> Instruction {
        build_transfer_instruction(payment, &self.program_id, payment.variant())
    }

    /// Validates `request`, then signs, sends and confirms the transfer.
    ///
    /// `signer` must be the request's sending wallet; it also pays the fee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payment`] if validation fails or `signer` is not the
    /// sending wallet, [`Error::ChainState`] if the accounts cannot be read,
    /// and [`Error::Submission`] if submission fails.
    pub async fn pay<S>(
        &self,
        request: &PaymentRequest,
        signer: &S,
    ) -> Result<SubmissionResult, Error>
    where
        S: WalletSigner + ?Sized,
    {
        let payment = self.check(request).await?;
        let signer_pubkey = signer.pubkey();
        if signer_pubkey != request.from_wallet() {
            return Err(PaymentError::InvalidOwner {
                owner: request.from_wallet(),
                signer: signer_pubkey,
            }
            .into());
        }

        let instruction = self.instruction(&payment);
        #[cfg(feature = "telemetry")]
        tracing::info!(
            from = %request.from_wallet(),
            to = %request.to_wallet(),
            mint = %request.token_mint(),
            amount = request.amount(),
            variant = payment.variant().instruction_name(),
            "Submitting payment"
        );
        let result = self.submitter.submit(instruction, signer).await?;
        Ok(result)
    }
}
