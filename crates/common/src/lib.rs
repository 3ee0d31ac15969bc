//! Common utilities and resources used across the siphon codebase.
//!
//! This crate provides shared functionality for the siphon toolkit,
//! including the ledger RPC layer and general utility functions.

/// Error types shared across siphon crates.
pub mod error;

/// Utilities for interacting with the ledger node over RPC.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;
