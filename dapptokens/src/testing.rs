//! In-memory chain doubles for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use solana_message::Hash;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

use crate::chain::{
    BlockhashSnapshot, ChainStateReader, PaymentRpc, ReaderError, SignerError, TransportError,
    WalletSigner,
};
use crate::payment::{PaymentContext, PaymentRequest};

/// Scriptable [`PaymentRpc`]. Every blockhash fetch yields a new blockhash;
/// sends and confirms succeed unless a result was queued.
#[derive(Debug, Default)]
pub(crate) struct MockRpc {
    blockhash_delay: Option<Duration>,
    blockhash_counter: AtomicU64,
    blockhash_failures: Mutex<VecDeque<TransportError>>,
    send_results: Mutex<VecDeque<Result<(), TransportError>>>,
    confirm_results: Mutex<VecDeque<Result<(), TransportError>>>,
    sent: Mutex<Vec<VersionedTransaction>>,
    confirms: AtomicUsize,
}

impl MockRpc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_blockhash_delay(mut self, delay: Duration) -> Self {
        self.blockhash_delay = Some(delay);
        self
    }

    pub(crate) fn fail_next_blockhash(&self, error: TransportError) {
        self.blockhash_failures.lock().unwrap().push_back(error);
    }

    pub(crate) fn push_send_result(&self, result: Result<(), TransportError>) {
        self.send_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_confirm_result(&self, result: Result<(), TransportError>) {
        self.confirm_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn blockhash_fetches(&self) -> u64 {
        self.blockhash_counter.load(Ordering::SeqCst)
    }

    pub(crate) fn sends(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn confirms(&self) -> usize {
        self.confirms.load(Ordering::SeqCst)
    }

    pub(crate) fn sent_transactions(&self) -> Vec<VersionedTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PaymentRpc for MockRpc {
    async fn get_latest_blockhash(&self) -> Result<BlockhashSnapshot, TransportError> {
        let n = self.blockhash_counter.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.blockhash_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.blockhash_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_le_bytes());
        Ok(BlockhashSnapshot::new(Hash::new_from_array(bytes), 1_000 + n))
    }

    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, TransportError> {
        self.sent.lock().unwrap().push(transaction.clone());
        let scripted = self.send_results.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))?;
        Ok(transaction.signatures[0])
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        _snapshot: &BlockhashSnapshot,
    ) -> Result<(), TransportError> {
        self.confirms.fetch_add(1, Ordering::SeqCst);
        let scripted = self.confirm_results.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))
    }
}

/// [`ChainStateReader`] returning a fixed context.
#[derive(Debug)]
pub(crate) struct MockReader {
    context: Result<PaymentContext, Pubkey>,
    reads: AtomicUsize,
}

impl MockReader {
    pub(crate) const fn new(context: PaymentContext) -> Self {
        Self {
            context: Ok(context),
            reads: AtomicUsize::new(0),
        }
    }

    /// A reader for which `address` does not exist.
    pub(crate) const fn missing(address: Pubkey) -> Self {
        Self {
            context: Err(address),
            reads: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChainStateReader for MockReader {
    async fn payment_context(
        &self,
        _request: &PaymentRequest,
    ) -> Result<PaymentContext, ReaderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.context.map_err(ReaderError::AccountNotFound)
    }
}

/// [`WalletSigner`] whose user declines every request.
#[derive(Debug)]
pub(crate) struct RejectingSigner {
    pubkey: Pubkey,
}

impl RejectingSigner {
    pub(crate) const fn new(pubkey: Pubkey) -> Self {
        Self { pubkey }
    }
}

#[async_trait::async_trait]
impl WalletSigner for RejectingSigner {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    async fn sign_transaction(
        &self,
        _transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SignerError> {
        Err(SignerError::Rejected("User rejected the request".into()))
    }
}
