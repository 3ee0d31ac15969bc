use clap::Parser;
use derive_builder::Builder;
use siphon_config::parse_url_arg;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Stream ledger transactions from a block range into a document-store collection",
    override_usage = "siphon ingest [OPTIONS]"
)]
/// Arguments for the ingest operation
///
/// This struct contains all the configuration parameters needed to walk a
/// block range and load its transactions into the gateway.
pub struct IngestArgs {
    /// The base URL of the document-store gateway.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub gateway_url: String,

    /// The username used to authenticate against the gateway.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub username: String,

    /// The password used to authenticate against the gateway.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub password: String,

    /// The RPC URL to use for fetching blocks.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// The collection transaction documents are inserted into.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub collection: String,

    /// The block height to start ingesting from (inclusive).
    #[clap(long, short, default_value = "0", hide_default_value = true, alias = "start_block")]
    pub from_block: u64,

    /// The block height to stop ingesting at (exclusive). Defaults to one
    /// past the latest block.
    #[clap(long, short, alias = "end_block")]
    pub to_block: Option<u64>,

    /// The request timeout, in seconds, applied to every HTTP call.
    /// Defaults to the configured timeout.
    #[clap(long)]
    pub timeout: Option<u64>,
}

impl IngestArgsBuilder {
    /// Creates a new IngestArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            gateway_url: Some(String::new()),
            username: Some(String::new()),
            password: Some(String::new()),
            rpc_url: Some(String::new()),
            collection: Some(String::new()),
            from_block: Some(0),
            to_block: Some(None),
            timeout: Some(None),
        }
    }
}
