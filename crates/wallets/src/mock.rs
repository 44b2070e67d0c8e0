//! Scriptable in-memory [`WalletProvider`] for tests.
//!
//! Defaults to a reachable wallet with no granted accounts on chain 1; tests
//! script the interesting behavior (rejections, failures, held
//! confirmations, pushed events) through the builder-style setters.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use alloy_primitives::{Address, ChainId, TxHash};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc};

use crate::{
    error::ProviderError,
    provider::{DeploymentRequest, PendingDeployment, WalletEvent, WalletProvider},
};

#[derive(Clone)]
pub struct MockProvider {
    inner: Arc<Inner>,
}

struct Inner {
    available: bool,
    accounts: Mutex<Vec<Address>>,
    chain_id: Mutex<ChainId>,
    reject_accounts: Mutex<Option<String>>,
    fail_submission: Mutex<Option<String>>,
    fail_confirmation: Mutex<Option<String>>,
    contract_address: Address,
    hold_confirmations: AtomicBool,
    release: Notify,
    account_requests: AtomicUsize,
    submissions: AtomicUsize,
    last_request: Mutex<Option<DeploymentRequest>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_availability(true)
    }

    /// A provider that behaves as if no wallet extension is installed.
    pub fn unavailable() -> Self {
        Self::with_availability(false)
    }

    fn with_availability(available: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                available,
                accounts: Mutex::new(Vec::new()),
                chain_id: Mutex::new(1),
                reject_accounts: Mutex::new(None),
                fail_submission: Mutex::new(None),
                fail_confirmation: Mutex::new(None),
                contract_address: Address::random(),
                hold_confirmations: AtomicBool::new(false),
                release: Notify::new(),
                account_requests: AtomicUsize::new(0),
                submissions: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        *self.inner.accounts.lock() = accounts;
        self
    }

    pub fn with_chain(self, chain_id: ChainId) -> Self {
        *self.inner.chain_id.lock() = chain_id;
        self
    }

    /// Script the next `eth_requestAccounts` to be declined.
    pub fn reject_next_accounts(&self, reason: &str) {
        *self.inner.reject_accounts.lock() = Some(reason.to_string());
    }

    /// Script every submission to fail before a transaction exists.
    pub fn fail_submission(&self, reason: &str) {
        *self.inner.fail_submission.lock() = Some(reason.to_string());
    }

    /// Script confirmations to fail after submission.
    pub fn fail_confirmation(&self, reason: &str) {
        *self.inner.fail_confirmation.lock() = Some(reason.to_string());
    }

    /// Keep confirmations pending until [`MockProvider::release_confirmations`].
    pub fn hold_confirmations(&self) {
        self.inner.hold_confirmations.store(true, Ordering::SeqCst);
    }

    pub fn release_confirmations(&self) {
        self.inner.hold_confirmations.store(false, Ordering::SeqCst);
        self.inner.release.notify_waiters();
    }

    /// Push a wallet notification to every subscriber.
    pub fn emit(&self, event: WalletEvent) {
        self.inner.subscribers.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// The address every confirmed deployment resolves to.
    pub fn contract_address(&self) -> Address {
        self.inner.contract_address
    }

    pub fn account_request_count(&self) -> usize {
        self.inner.account_requests.load(Ordering::SeqCst)
    }

    pub fn submission_count(&self) -> usize {
        self.inner.submissions.load(Ordering::SeqCst)
    }

    /// The most recent deployment request the provider saw.
    pub fn last_request(&self) -> Option<DeploymentRequest> {
        self.inner.last_request.lock().clone()
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    fn is_available(&self) -> bool {
        self.inner.available
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.inner.account_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.inner.reject_accounts.lock().take() {
            return Err(ProviderError::Rejected(reason));
        }
        Ok(self.inner.accounts.lock().clone())
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        Ok(*self.inner.chain_id.lock())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.lock().push(tx);
        rx
    }

    async fn submit_deployment(
        &self,
        request: DeploymentRequest,
    ) -> Result<PendingDeployment, ProviderError> {
        self.inner.submissions.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_request.lock() = Some(request);
        if let Some(reason) = self.inner.fail_submission.lock().clone() {
            return Err(ProviderError::Rejected(reason));
        }
        Ok(PendingDeployment { tx_hash: TxHash::random() })
    }

    async fn await_confirmation(
        &self,
        _pending: &PendingDeployment,
    ) -> Result<Address, ProviderError> {
        loop {
            let released = self.inner.release.notified();
            if !self.inner.hold_confirmations.load(Ordering::SeqCst) {
                break;
            }
            released.await;
        }
        if let Some(reason) = self.inner.fail_confirmation.lock().clone() {
            return Err(ProviderError::Rpc(reason));
        }
        Ok(self.inner.contract_address)
    }
}
