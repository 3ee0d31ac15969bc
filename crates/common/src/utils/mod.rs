/// HTTP client construction helpers.
pub mod http;

/// Input/output utilities.
pub mod io;
