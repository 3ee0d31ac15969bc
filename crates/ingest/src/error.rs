/// Generic error type for the Ingest Module
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
