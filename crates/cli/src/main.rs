pub(crate) mod error;
pub(crate) mod log_args;

use error::Error;
use log_args::LogArgs;
use tracing::info;

use clap::{Parser, Subcommand};

use siphon_config::{config, ConfigArgs, Configuration};
use siphon_ingest::{ingest, IngestArgs};

#[derive(Debug, Parser)]
#[clap(name = "siphon", version)]
pub struct Arguments {
    #[clap(subcommand)]
    pub sub: Subcommands,

    #[clap(flatten)]
    logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "Siphon streams ledger transactions into a document store.")]
pub enum Subcommands {
    #[clap(
        name = "ingest",
        about = "Stream ledger transactions from a block range into a document-store collection"
    )]
    Ingest(IngestArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _ = args.logs.init_tracing();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    match args.sub {
        Subcommands::Ingest(mut cmd) => {
            // if the user has not specified a rpc url, use the default
            if cmd.rpc_url.as_str() == "" {
                cmd.rpc_url = configuration.rpc_url;
            }

            // if the user has not specified gateway settings, use the defaults
            if cmd.gateway_url.as_str() == "" {
                cmd.gateway_url = configuration.gateway_url;
            }
            if cmd.username.as_str() == "" {
                cmd.username = configuration.gateway_username;
            }
            if cmd.password.as_str() == "" {
                cmd.password = configuration.gateway_password;
            }
            if cmd.collection.as_str() == "" {
                cmd.collection = configuration.collection;
            }
            if cmd.timeout.is_none() {
                cmd.timeout = Some(configuration.timeout);
            }

            let report = ingest(cmd).await?;

            info!(
                "done. blocks={}  inserted={}  failed={}",
                report.blocks, report.inserted, report.failed
            );
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
