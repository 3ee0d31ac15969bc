/// Errors returned by the gateway client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error with a message
    #[error("{0}")]
    Generic(String),

    /// Authentication against the gateway failed. This is always fatal: the
    /// run must never proceed without a usable token.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The gateway rejected the bearer token (401). Tokens are short-lived
    /// and are not refreshed within a run.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The gateway returned an unexpected status code
    #[error("Unexpected status {status} from '{url}'")]
    Status {
        /// The HTTP status code returned
        status: reqwest::StatusCode,
        /// The URL that was called
        url: String,
    },

    /// A transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
