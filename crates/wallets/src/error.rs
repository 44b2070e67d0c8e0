/// Errors surfaced by a [`crate::WalletProvider`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no wallet provider is reachable")]
    Unavailable,
    /// The user or the wallet declined the request.
    #[error("{0}")]
    Rejected(String),
    #[error("rpc error: {0}")]
    Rpc(String),
}

/// Errors surfaced by [`crate::WalletSession::connect`].
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("no browser wallet is available; install one to connect")]
    Unavailable,
    #[error("wallet connection rejected: {reason}")]
    Rejected { reason: String },
}
