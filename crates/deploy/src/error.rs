use alloy_primitives::ChainId;

/// Failure modes of a deployment attempt.
///
/// The first three are precondition failures raised before any external call;
/// the last two carry the wallet/chain error from a started attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("refusing to deploy to unrecognized network (chain id {0})")]
    UnsupportedNetwork(ChainId),
    #[error("a deployment is already in flight")]
    AlreadyInFlight,
    /// Signing/RPC failure before a transaction existed. No record may be
    /// created.
    #[error("deployment submission failed: {0}")]
    Submission(String),
    /// The transaction was submitted but never confirmed successfully.
    #[error("deployment confirmation failed: {0}")]
    Confirmation(String),
}
