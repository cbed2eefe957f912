//! Wallet signing.
//!
//! Signing may involve a human approving a prompt in an external wallet, so it
//! is an awaited call and a refusal is reported as its own error variant.

use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

/// Errors returned by a [`WalletSigner`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The wallet or its user declined to sign.
    #[error("Signature request rejected: {0}")]
    Rejected(String),
    /// The signer is not one of the transaction's required signers.
    #[error("Signer {0} not found in required signers")]
    NotRequiredSigner(Pubkey),
    /// Signing failed for another reason.
    #[error("Can not sign transaction: {0}")]
    Failed(String),
}

/// Signs transactions on behalf of a wallet.
#[async_trait::async_trait]
pub trait WalletSigner: Send + Sync {
    /// The wallet address; used as fee payer and transfer authority.
    fn pubkey(&self) -> Pubkey;

    /// Returns `transaction` with this wallet's signature filled in.
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SignerError>;
}

/// [`WalletSigner`] over a local [`Signer`] such as a keypair.
#[derive(Debug, Clone)]
pub struct KeypairSigner<S> {
    inner: S,
}

impl<S> KeypairSigner<S> {
    /// Wraps a local signer.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns the wrapped signer.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<S: Signer + Send + Sync> WalletSigner for KeypairSigner<S> {
    fn pubkey(&self) -> Pubkey {
        self.inner.pubkey()
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SignerError> {
        sign_with_signer(transaction, &self.inner)
    }
}

/// Places `signer`'s signature over the message at the signer's slot.
///
/// Other signature slots are left untouched, so the transaction may still be
/// partially signed afterwards.
///
/// # Errors
///
/// Returns [`SignerError::NotRequiredSigner`] if `signer` is not among the
/// message's required signers, or [`SignerError::Failed`] if signing fails.
pub fn sign_with_signer<S: Signer + ?Sized>(
    mut transaction: VersionedTransaction,
    signer: &S,
) -> Result<VersionedTransaction, SignerError> {
    let signer_pubkey = signer.pubkey();
    let num_required = transaction.message.header().num_required_signatures as usize;
    let position = transaction
        .message
        .static_account_keys()
        .iter()
        .take(num_required)
        .position(|key| *key == signer_pubkey)
        .ok_or(SignerError::NotRequiredSigner(signer_pubkey))?;

    let message_bytes = transaction.message.serialize();
    let signature = signer
        .try_sign_message(&message_bytes)
        .map_err(|e| SignerError::Failed(e.to_string()))?;

    if transaction.signatures.len() < num_required {
        transaction
            .signatures
            .resize(num_required, Signature::default());
    }
    transaction.signatures[position] = signature;
    Ok(transaction)
}

/// Whether every required signature slot holds a non-default signature.
#[must_use]
pub fn is_fully_signed(transaction: &VersionedTransaction) -> bool {
    let num_required = transaction.message.header().num_required_signatures as usize;
    transaction.signatures.len() >= num_required
        && transaction
            .signatures
            .iter()
            .all(|signature| *signature != Signature::default())
}
