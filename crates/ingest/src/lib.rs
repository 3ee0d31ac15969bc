//! The Ingest module streams ledger transactions into a document store.
//! It walks a range of block heights, extracts each block's transactions
//! over RPC, and point-inserts each one into a gateway collection, keyed
//! by its transaction hash.

/// Error types for the ingest module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{ingest, BlockSource, DocumentSink, IngestReport};
pub use error::Error;
pub use interfaces::{IngestArgs, IngestArgsBuilder};
