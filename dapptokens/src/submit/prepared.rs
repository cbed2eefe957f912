use solana_instruction::Instruction;
use solana_message::v0::Message as MessageV0;
use solana_message::{Message, VersionedMessage};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

use super::config::MessageVersion;
use super::error::SubmissionError;
use crate::chain::BlockhashSnapshot;

/// One submission attempt: an instruction bound to a fee payer and a
/// blockhash.
///
/// Built fresh for every attempt, since the blockhash expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    instructions: Vec<Instruction>,
    fee_payer: Pubkey,
    snapshot: BlockhashSnapshot,
    version: MessageVersion,
}

impl PreparedTransaction {
    /// Prepares a v0 transaction carrying `instruction`.
    #[must_use]
    pub fn new(instruction: Instruction, fee_payer: Pubkey, snapshot: BlockhashSnapshot) -> Self {
        Self {
            instructions: vec![instruction],
            fee_payer,
            snapshot,
            version: MessageVersion::default(),
        }
    }

    /// Selects the message format.
    #[must_use]
    pub const fn with_version(mut self, version: MessageVersion) -> Self {
        self.version = version;
        self
    }

    /// The instructions, in execution order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The fee payer.
    #[must_use]
    pub const fn fee_payer(&self) -> Pubkey {
        self.fee_payer
    }

    /// The blockhash the transaction references.
    #[must_use]
    pub const fn snapshot(&self) -> BlockhashSnapshot {
        self.snapshot
    }

    /// The message format.
    #[must_use]
    pub const fn version(&self) -> MessageVersion {
        self.version
    }

    /// Compiles the message and returns a transaction with empty signature
    /// slots, ready for the signer.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InvalidTransaction`] if the message cannot
    /// be compiled.
    pub fn to_unsigned(&self) -> Result<VersionedTransaction, SubmissionError> {
        let blockhash = self.snapshot.blockhash;
        let message = match self.version {
            MessageVersion::V0 => {
                let message =
                    MessageV0::try_compile(&self.fee_payer, &self.instructions, &[], blockhash)
                        .map_err(|e| SubmissionError::InvalidTransaction(format!("{e:?}")))?;
                VersionedMessage::V0(message)
            }
            MessageVersion::Legacy => VersionedMessage::Legacy(Message::new_with_blockhash(
                &self.instructions,
                Some(&self.fee_payer),
                &blockhash,
            )),
        };
        let num_required = usize::from(message.header().num_required_signatures);
        Ok(VersionedTransaction {
            signatures: vec![Signature::default(); num_required],
            message,
        })
    }
}
