//! # Wallet connectivity for the token deployer
//!
//! This crate owns the two boundaries between the deployer core and a browser
//! wallet:
//!
//! - [`WalletProvider`]: the EIP-1193-shaped interface an injected wallet
//!   exposes — account access requests, the active chain, transaction
//!   submission/confirmation and the `accountsChanged`/`chainChanged` event
//!   stream. Reference: <https://eips.ethereum.org/EIPS/eip-1193>.
//! - [`WalletSession`]: the single authoritative in-memory representation of
//!   "which account is connected on which chain". It is the only writer of
//!   the session triple; everything else reads snapshots.
//!
//! Wallet extensions own the actual connection. Disconnecting here only clears
//! local state, and external account/chain switches arrive as events that the
//! session folds into itself.

mod error;
mod provider;
mod session;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{ProviderError, WalletError};
pub use provider::{DeploymentRequest, PendingDeployment, WalletEvent, WalletProvider};
pub use session::{ConnectionState, Session, WalletSession};
