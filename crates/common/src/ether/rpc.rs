use crate::{error::Error, ether::provider::MultiTransportProvider};
use serde_json::Value;
use tracing::trace;

/// Get the chainId of the provided RPC URL
///
/// ```no_run
/// use siphon_common::ether::rpc::chain_id;
///
/// // let chain_id = chain_id("https://eth.llamarpc.com").await?;
/// // assert_eq!(chain_id, 1);
/// ```
pub async fn chain_id(rpc_url: &str) -> Result<u64, Error> {
    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;
    provider
        .get_chainid()
        .await
        .map_err(|e| Error::RpcError(format!("failed to get chain id: {e}")))
}

/// Get the latest block number of the provided RPC URL
///
/// ```no_run
/// use siphon_common::ether::rpc::latest_block_number;
/// // let block_number = latest_block_number("https://eth.llamarpc.com").await?;
/// // assert!(block_number > 0);
/// ```
pub async fn latest_block_number(rpc_url: &str) -> Result<u64, Error> {
    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;
    provider
        .get_block_number()
        .await
        .map_err(|e| Error::RpcError(format!("failed to get block number: {e}")))
}

/// Get the ordered list of transactions embedded in the given block, each
/// serialized into a plain JSON object with all ledger fields preserved.
///
/// ```no_run
/// use siphon_common::ether::rpc::get_block_transactions;
///
/// // let txs = get_block_transactions(18_000_000, "https://eth.llamarpc.com").await?;
/// // assert!(!txs.is_empty());
/// ```
pub async fn get_block_transactions(
    block_number: u64,
    rpc_url: &str,
) -> Result<Vec<Value>, Error> {
    trace!("fetching block '{}' with full transactions", &block_number);

    let provider = MultiTransportProvider::connect(rpc_url)
        .await
        .map_err(|_| Error::RpcError(format!("failed to connect to provider '{}'", &rpc_url)))?;

    let block = provider
        .get_block_by_number(block_number)
        .await
        .map_err(|e| Error::RpcError(format!("failed to get block: {e}")))?
        .ok_or_else(|| Error::RpcError(format!("block {block_number} not found")))?;

    // order within the block is preserved
    block
        .transactions
        .into_transactions()
        .map(|tx| serde_json::to_value(tx).map_err(Error::SerdeError))
        .collect()
}

#[cfg(test)]
pub mod tests {
    use crate::ether::rpc::*;

    #[tokio::test]
    async fn test_chain_id() {
        let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| {
            println!("RPC_URL not set, skipping test");
            std::process::exit(0);
        });

        let rpc_chain_id = chain_id(&rpc_url).await.expect("chain_id() returned an error!");

        assert_eq!(rpc_chain_id, 1);
    }

    #[tokio::test]
    async fn test_chain_id_invalid_rpc_url() {
        let rpc_url = "https://none.llamarpc.com";
        let rpc_chain_id = chain_id(rpc_url).await;

        assert!(rpc_chain_id.is_err())
    }

    #[tokio::test]
    async fn test_latest_block_number() {
        let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| {
            println!("RPC_URL not set, skipping test");
            std::process::exit(0);
        });

        let block_number = latest_block_number(&rpc_url)
            .await
            .expect("latest_block_number() returned an error!");

        assert!(block_number > 0);
    }

    #[tokio::test]
    async fn test_get_block_transactions() {
        let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| {
            println!("RPC_URL not set, skipping test");
            std::process::exit(0);
        });

        let transactions = get_block_transactions(18_000_000, &rpc_url)
            .await
            .expect("get_block_transactions() returned an error!");

        assert!(!transactions.is_empty());
        assert!(transactions.iter().all(|tx| tx.get("hash").is_some()));
    }

    #[tokio::test]
    async fn test_get_block_transactions_invalid_rpc_url() {
        let rpc_url = "https://none.llamarpc.com";
        let transactions = get_block_transactions(18_000_000, rpc_url).await;

        assert!(transactions.is_err())
    }
}
