//! # Token deployment coordinator
//!
//! Drives a single ERC-20 deployment attempt through its lifecycle:
//!
//! ```text
//! Idle -> Submitting -> AwaitingConfirmation -> Succeeded | Failed
//! ```
//!
//! The contract parameters (name, symbol, decimals, supply) are fixed
//! configuration in this build, not user input — see [`TokenTemplate`]. The
//! field validation routine is kept as a standalone capability for a future
//! editable-parameters mode.
//!
//! Progress is published as [`DeploymentAttempt`] snapshots through a watch
//! channel; [`DeploymentCoordinator::deploy`] resolves to the terminal
//! [`DeploymentOutcome`]. Exactly one attempt per coordinator may be in
//! flight; the succeeded outcome is the caller's sole trigger for persisting
//! a deployment record.

mod coordinator;
mod error;
mod template;
mod validate;

pub use coordinator::{
    DeploymentAttempt, DeploymentCoordinator, DeploymentOutcome, DeploymentStatus,
};
pub use error::DeployError;
pub use template::{
    TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL, TOKEN_TOTAL_SUPPLY, TokenTemplate,
};
pub use validate::{MAX_SAFE_SUPPLY, ValidationError, validate_template};
