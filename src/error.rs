use thiserror::Error;

/// Failures scoped to a single desk action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    #[error("Wallet not connected")]
    WalletNotConnected,
    #[error("Invalid token selection: {0}")]
    InvalidToken(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Signing rejected, RPC error or reverted transaction.
    #[error("{0}")]
    RemoteCall(String),
}

impl DeskError {
    pub fn remote(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on a single line
        Self::RemoteCall(format!("{:#}", err))
    }
}
