//! Client for the REST document-store gateway.
//!
//! Exchanges long-lived credentials for a short-lived bearer token, provisions
//! collections idempotently, and performs point inserts of JSON documents.

/// Error types for the gateway client
pub mod error;

mod auth;
mod client;
mod context;

// re-export the public interface
pub use auth::{authenticate, BearerToken};
pub use client::GatewayClient;
pub use context::RequestContext;
pub use error::Error;
