//! Create a custom data transport to use with a Provider.
use alloy::{
    eips::BlockNumberOrTag,
    network::Ethereum,
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::Block,
};
use eyre::Result;

/// [`MultiTransportProvider`] is a convenience wrapper around the different transport types
/// supported by the [`Provider`].
#[derive(Clone, Debug)]
pub struct MultiTransportProvider {
    provider: RootProvider<Ethereum>,
}

// We implement a convenience "constructor" method, to easily initialize the transport.
// This will connect to [`Http`] if the rpc_url contains 'http', to [`Ws`] if it contains 'ws',
// otherwise it'll default to [`Ipc`].
impl MultiTransportProvider {
    /// Connect to a provider using the given rpc_url.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        if rpc_url.is_empty() {
            return Err(eyre::eyre!("No RPC URL provided"));
        }

        let provider = ProviderBuilder::new().connect(rpc_url).await?.root().clone();
        Ok(Self { provider })
    }

    /// Get the chain id.
    pub async fn get_chainid(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Get the block at the given height, with full transaction bodies.
    pub async fn get_block_by_number(&self, block_number: u64) -> Result<Option<Block>> {
        Ok(self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block_number))
            .full()
            .await?)
    }
}
