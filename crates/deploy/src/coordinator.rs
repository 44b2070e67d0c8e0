use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use alloy_primitives::{Address, ChainId, TxHash};
use serde::{Deserialize, Serialize};
use tokenmint_networks::NetworkKind;
use tokenmint_wallets::{DeploymentRequest, Session, WalletProvider};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{error::DeployError, template::TokenTemplate};

/// Lifecycle state of a deployment attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Idle,
    Submitting,
    AwaitingConfirmation,
    Succeeded,
    Failed,
}

impl DeploymentStatus {
    /// Whether the attempt is past its terminal transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::AwaitingConfirmation)
    }
}

/// Progress snapshot of the current deployment attempt.
///
/// `tx_hash` appears once the transaction was accepted for submission;
/// `contract_address` only on success. A failed attempt never carries a
/// contract address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentAttempt {
    pub status: DeploymentStatus,
    pub message: String,
    pub tx_hash: Option<TxHash>,
    pub contract_address: Option<Address>,
}

impl DeploymentAttempt {
    fn idle() -> Self {
        Self {
            status: DeploymentStatus::Idle,
            message: String::new(),
            tx_hash: None,
            contract_address: None,
        }
    }
}

/// Terminal result of a succeeded attempt.
///
/// Tagged with the chain the transaction was submitted against: the wallet
/// may have switched chains mid-flight, and callers must compare this to the
/// current session chain before trusting the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub tx_hash: TxHash,
    pub contract_address: Address,
    pub chain_id: ChainId,
    pub network_name: String,
}

/// Runs one deployment attempt at a time against the fixed template and the
/// session's active account.
///
/// Cloneable handle; clones share the in-flight guard and the status channel.
/// The coordinator is the sole writer of its [`DeploymentAttempt`], and a
/// succeeded outcome is the caller's only trigger for persisting a record —
/// the coordinator itself never touches storage.
#[derive(Clone)]
pub struct DeploymentCoordinator {
    provider: Arc<dyn WalletProvider>,
    template: TokenTemplate,
    in_flight: Arc<AtomicBool>,
    attempt: Arc<watch::Sender<DeploymentAttempt>>,
}

impl DeploymentCoordinator {
    pub fn new(provider: Arc<dyn WalletProvider>, template: TokenTemplate) -> Self {
        let (attempt, _) = watch::channel(DeploymentAttempt::idle());
        Self { provider, template, in_flight: Arc::new(AtomicBool::new(false)), attempt: Arc::new(attempt) }
    }

    /// Subscribe to attempt snapshots as the state machine advances.
    pub fn subscribe(&self) -> watch::Receiver<DeploymentAttempt> {
        self.attempt.subscribe()
    }

    /// Current attempt snapshot.
    pub fn attempt(&self) -> DeploymentAttempt {
        self.attempt.borrow().clone()
    }

    /// Deploy the fixed template using the given session snapshot.
    ///
    /// Preconditions are checked before any external call: the session must
    /// be connected, on a recognized network, and no other attempt may be in
    /// flight (a concurrent call is rejected without disturbing the running
    /// attempt). Exactly one terminal transition occurs per call.
    pub async fn deploy(&self, session: &Session) -> Result<DeploymentOutcome, DeployError> {
        let (Some(account), Some(chain_id)) = (session.account, session.chain_id) else {
            return Err(DeployError::NotConnected);
        };
        if session.network_kind() == NetworkKind::Unknown {
            return Err(DeployError::UnsupportedNetwork(chain_id));
        }
        let _guard =
            InFlightGuard::acquire(&self.in_flight).ok_or(DeployError::AlreadyInFlight)?;

        let network_name = session.network_name();
        self.publish(DeploymentAttempt {
            status: DeploymentStatus::Submitting,
            message: format!(
                "Deploying {} to {network_name}. Please confirm the transaction in your wallet...",
                self.template.name
            ),
            tx_hash: None,
            contract_address: None,
        });

        let request = DeploymentRequest {
            from: account,
            bytecode: self.template.bytecode.clone(),
            abi: self.template.abi.clone(),
            owner: account,
        };
        let pending = match self.provider.submit_deployment(request).await {
            Ok(pending) => pending,
            Err(err) => {
                warn!(%err, "deployment submission failed");
                self.publish(DeploymentAttempt {
                    status: DeploymentStatus::Failed,
                    message: format!("Deployment failed: {err}"),
                    tx_hash: None,
                    contract_address: None,
                });
                return Err(DeployError::Submission(err.to_string()));
            }
        };

        self.publish(DeploymentAttempt {
            status: DeploymentStatus::AwaitingConfirmation,
            message: "Transaction submitted. Waiting for on-chain confirmation...".to_string(),
            tx_hash: Some(pending.tx_hash),
            contract_address: None,
        });

        match self.provider.await_confirmation(&pending).await {
            Ok(contract_address) => {
                debug!(%contract_address, tx_hash = %pending.tx_hash, chain_id, "token deployed");
                self.publish(DeploymentAttempt {
                    status: DeploymentStatus::Succeeded,
                    message: "Token successfully deployed!".to_string(),
                    tx_hash: Some(pending.tx_hash),
                    contract_address: Some(contract_address),
                });
                Ok(DeploymentOutcome {
                    tx_hash: pending.tx_hash,
                    contract_address,
                    chain_id,
                    network_name,
                })
            }
            Err(err) => {
                warn!(%err, tx_hash = %pending.tx_hash, "deployment confirmation failed");
                self.publish(DeploymentAttempt {
                    status: DeploymentStatus::Failed,
                    message: format!("Deployment failed: {err}"),
                    tx_hash: Some(pending.tx_hash),
                    contract_address: None,
                });
                Err(DeployError::Confirmation(err.to_string()))
            }
        }
    }

    fn publish(&self, attempt: DeploymentAttempt) {
        debug!(status = ?attempt.status, "deployment status");
        self.attempt.send_replace(attempt);
    }
}

/// Holds the single-attempt slot; released on every exit path, including
/// cancellation of the `deploy` future.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(slot: &'a AtomicBool) -> Option<Self> {
        slot.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then_some(Self(slot))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
