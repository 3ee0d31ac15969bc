/// Generic error type shared by the siphon crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error with a message
    #[error("{0}")]
    Generic(String),
    /// An error returned by, or while talking to, the ledger RPC node
    #[error("RPC error: {0}")]
    RpcError(String),
    /// IO error
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    /// JSON (de)serialization error
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
