use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, ChainId, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::ProviderError;

/// Notification pushed by the wallet at any time, including while another
/// request is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    /// `accountsChanged`: the granted account list changed. An empty list
    /// means access was revoked.
    AccountsChanged(Vec<Address>),
    /// `chainChanged`: the active chain switched. The payload is the hex
    /// chain id string as wallets emit it, e.g. `"0xaa36a7"`.
    ChainChanged(String),
}

/// A contract creation handed to the wallet for signing and submission.
///
/// Browser wallets sign and send in one step, so there is no separate
/// signature to carry back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub from: Address,
    pub bytecode: Bytes,
    pub abi: JsonAbi,
    /// Constructor argument: the account the token mints its supply to.
    pub owner: Address,
}

/// A submitted, not yet confirmed contract creation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PendingDeployment {
    pub tx_hash: TxHash,
}

/// The interface an injected browser wallet exposes to the page.
///
/// All methods other than [`WalletProvider::is_available`] suspend; none of
/// them can be retracted once issued. Callers that care about staleness must
/// compare session identity before and after the call.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet interface is reachable at all (the
    /// `window.ethereum` presence probe).
    fn is_available(&self) -> bool;

    /// `eth_requestAccounts`: ask the wallet to grant account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_chainId`: the chain the wallet is currently pointed at.
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// Subscribe to `accountsChanged`/`chainChanged` notifications.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent>;

    /// Sign and broadcast a contract creation, returning its pending hash.
    async fn submit_deployment(
        &self,
        request: DeploymentRequest,
    ) -> Result<PendingDeployment, ProviderError>;

    /// Wait until the chain confirms the creation and report the deployed
    /// contract's address.
    async fn await_confirmation(
        &self,
        pending: &PendingDeployment,
    ) -> Result<Address, ProviderError>;
}
