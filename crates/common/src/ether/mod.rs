/// Thin wrapper around alloy's provider types.
pub mod provider;

/// Block and transaction RPC helpers.
pub mod rpc;
