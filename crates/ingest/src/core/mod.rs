mod records;

use async_trait::async_trait;
use eyre::eyre;
use serde_json::Value;
use siphon_common::ether::rpc;
use siphon_gateway::{authenticate, Error as GatewayError, GatewayClient, RequestContext};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::{error::Error, interfaces::IngestArgs};
use records::to_document;

/// A source of blocks and their embedded transactions.
///
/// The production implementation is the ledger RPC node; tests drive the
/// range driver against a synthetic in-memory ledger.
#[async_trait]
pub trait BlockSource {
    /// The latest block height known to the source.
    async fn latest_block_number(&self) -> Result<u64, siphon_common::error::Error>;

    /// The ordered transactions embedded in the given block, each as a plain
    /// JSON object with all ledger fields preserved.
    async fn transactions_in_block(
        &self,
        block_number: u64,
    ) -> Result<Vec<Value>, siphon_common::error::Error>;
}

/// A keyed document sink accepting point inserts.
///
/// The production implementation is the gateway client.
#[async_trait]
pub trait DocumentSink {
    /// Idempotently ensure the named collection exists.
    async fn ensure_collection(&self, collection: &str) -> Result<(), GatewayError>;

    /// Insert one `_id`-keyed document into the named collection.
    async fn insert(&self, collection: &str, document: &Value) -> Result<(), GatewayError>;
}

/// [`BlockSource`] backed by the ledger RPC node.
#[derive(Clone, Debug)]
pub(crate) struct RpcSource {
    rpc_url: String,
}

impl RpcSource {
    pub(crate) fn new(rpc_url: &str) -> Self {
        Self { rpc_url: rpc_url.to_string() }
    }
}

#[async_trait]
impl BlockSource for RpcSource {
    async fn latest_block_number(&self) -> Result<u64, siphon_common::error::Error> {
        rpc::latest_block_number(&self.rpc_url).await
    }

    async fn transactions_in_block(
        &self,
        block_number: u64,
    ) -> Result<Vec<Value>, siphon_common::error::Error> {
        rpc::get_block_transactions(block_number, &self.rpc_url).await
    }
}

#[async_trait]
impl DocumentSink for GatewayClient {
    async fn ensure_collection(&self, collection: &str) -> Result<(), GatewayError> {
        GatewayClient::ensure_collection(self, collection).await
    }

    async fn insert(&self, collection: &str, document: &Value) -> Result<(), GatewayError> {
        GatewayClient::insert(self, collection, document).await
    }
}

/// Summary of a completed ingest run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of blocks walked
    pub blocks: u64,
    /// Number of documents successfully inserted
    pub inserted: u64,
    /// Number of records that failed to key or insert
    pub failed: u64,
}

/// Streams ledger transactions into a document-store collection
///
/// Authenticates against the gateway, idempotently provisions the target
/// collection, then walks the half-open block range `[from_block, to_block)`
/// strictly sequentially: extract the block's transactions, key each one by
/// its hash, and point-insert it. Inserts are best-effort with per-record
/// isolation; setup failures abort the run.
///
/// # Arguments
///
/// * `args` - Configuration parameters for the ingest operation
///
/// # Returns
///
/// An [`IngestReport`] summarizing the run
pub async fn ingest(args: IngestArgs) -> Result<IngestReport, Error> {
    let start_time = Instant::now();
    let timeout = args.timeout.unwrap_or(10);

    // fail fast if we cannot obtain a credential. proceeding without one
    // would only produce a wall of 401s downstream.
    let token = authenticate(&args.gateway_url, &args.username, &args.password, timeout)
        .await
        .map_err(|e| eyre!("authentication failed: {e}"))?;
    let ctx = RequestContext::new(&args.gateway_url, token, timeout);
    let sink = GatewayClient::new(ctx).map_err(|e| eyre!("failed to build gateway client: {e}"))?;

    let source = RpcSource::new(&args.rpc_url);

    // resolve the half-open block range. an unset end means "through latest"
    let from_block = args.from_block;
    let to_block = match args.to_block {
        Some(to_block) => to_block,
        None => {
            source.latest_block_number().await.map_err(|e| eyre!("rpc error: {e}"))?.saturating_add(1)
        }
    };
    if to_block < from_block {
        return Err(eyre!("invalid block range: [{from_block}, {to_block})").into());
    }

    let collection =
        if args.collection.is_empty() { "transactions" } else { args.collection.as_str() };
    debug!("ingesting block range [{}, {}) into collection '{}'", from_block, to_block, collection);

    sink.ensure_collection(collection)
        .await
        .map_err(|e| eyre!("failed to provision collection '{collection}': {e}"))?;

    let report = drive_range(&source, &sink, collection, from_block, to_block).await?;

    info!(
        "inserted {} documents from {} blocks ({} failures) in {:?}",
        report.inserted,
        report.blocks,
        report.failed,
        start_time.elapsed()
    );
    Ok(report)
}

/// Walk `[from_block, to_block)` sequentially, extracting each block and
/// loading its transactions one point-insert at a time.
///
/// A failed insert is logged and counted but never stops the remaining
/// records, with one exception: a 401 aborts the run, since the token cannot
/// recover and every remaining insert would fail the same way. A failed
/// block fetch is a setup-class failure and aborts.
async fn drive_range<S: BlockSource, K: DocumentSink>(
    source: &S,
    sink: &K,
    collection: &str,
    from_block: u64,
    to_block: u64,
) -> Result<IngestReport, Error> {
    let mut report = IngestReport::default();

    for block_number in from_block..to_block {
        let transactions = source
            .transactions_in_block(block_number)
            .await
            .map_err(|e| eyre!("failed to fetch block {block_number}: {e}"))?;
        debug!("block {}: extracted {} transactions", block_number, transactions.len());

        for transaction in transactions {
            let document = match to_document(transaction) {
                Ok(document) => document,
                Err(e) => {
                    error!("skipping malformed record in block {}: {}", block_number, e);
                    report.failed += 1;
                    continue;
                }
            };

            match sink.insert(collection, &document).await {
                Ok(()) => report.inserted += 1,
                Err(GatewayError::Unauthorized(e)) => {
                    return Err(eyre!("token expired mid-run at block {block_number}: {e}").into())
                }
                Err(e) => {
                    error!(
                        "failed to insert document '{}' from block {}: {}",
                        document["_id"], block_number, e
                    );
                    report.failed += 1;
                }
            }
        }

        report.blocks += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{collections::HashMap, sync::Mutex};

    /// Synthetic in-memory ledger.
    struct FakeLedger {
        blocks: HashMap<u64, Vec<Value>>,
        fetches: Mutex<u64>,
    }

    impl FakeLedger {
        fn new(blocks: Vec<(u64, Vec<Value>)>) -> Self {
            Self { blocks: blocks.into_iter().collect(), fetches: Mutex::new(0) }
        }
    }

    #[async_trait]
    impl BlockSource for FakeLedger {
        async fn latest_block_number(&self) -> Result<u64, siphon_common::error::Error> {
            Ok(self.blocks.keys().copied().max().unwrap_or(0))
        }

        async fn transactions_in_block(
            &self,
            block_number: u64,
        ) -> Result<Vec<Value>, siphon_common::error::Error> {
            *self.fetches.lock().expect("poisoned lock") += 1;
            self.blocks.get(&block_number).cloned().ok_or_else(|| {
                siphon_common::error::Error::RpcError(format!("block {block_number} not found"))
            })
        }
    }

    /// Sink that records every insert and can be told to fail some of them.
    #[derive(Default)]
    struct RecordingSink {
        inserted: Mutex<Vec<(String, Value)>>,
        provisioned: Mutex<Vec<String>>,
        attempts: Mutex<u64>,
        fail_attempt: Option<u64>,
        expire_at_attempt: Option<u64>,
    }

    #[async_trait]
    impl DocumentSink for RecordingSink {
        async fn ensure_collection(&self, collection: &str) -> Result<(), GatewayError> {
            self.provisioned.lock().expect("poisoned lock").push(collection.to_string());
            Ok(())
        }

        async fn insert(&self, collection: &str, document: &Value) -> Result<(), GatewayError> {
            let mut attempts = self.attempts.lock().expect("poisoned lock");
            *attempts += 1;

            if Some(*attempts) == self.fail_attempt {
                return Err(GatewayError::Generic("gateway hiccup".to_string()));
            }
            if Some(*attempts) == self.expire_at_attempt {
                return Err(GatewayError::Unauthorized("token expired".to_string()));
            }

            self.inserted
                .lock()
                .expect("poisoned lock")
                .push((collection.to_string(), document.clone()));
            Ok(())
        }
    }

    fn tx(hash: &str) -> Value {
        json!({ "hash": hash, "from": "0x1111", "to": "0x2222", "nonce": "0x0" })
    }

    #[tokio::test]
    async fn test_drive_range_inserts_every_transaction() {
        let source = FakeLedger::new(vec![
            (100, vec![tx("0xa1"), tx("0xa2")]),
            (101, vec![]),
            (102, vec![tx("0xb1"), tx("0xb2"), tx("0xb3")]),
        ]);
        let sink = RecordingSink::default();

        let report = drive_range(&source, &sink, "mainnet_txs", 100, 103)
            .await
            .expect("drive_range() returned an error!");

        assert_eq!(report, IngestReport { blocks: 3, inserted: 5, failed: 0 });

        let inserted = sink.inserted.lock().expect("poisoned lock");
        assert_eq!(inserted.len(), 5);
        assert!(inserted.iter().all(|(collection, _)| collection == "mainnet_txs"));

        let keys: Vec<_> =
            inserted.iter().map(|(_, doc)| doc["_id"].as_str().expect("no _id").to_string()).collect();
        assert_eq!(keys, vec!["0xa1", "0xa2", "0xb1", "0xb2", "0xb3"]);
    }

    #[tokio::test]
    async fn test_drive_range_isolates_insert_failures() {
        let source = FakeLedger::new(vec![(
            100,
            vec![tx("0x1"), tx("0x2"), tx("0x3"), tx("0x4"), tx("0x5")],
        )]);
        let sink = RecordingSink { fail_attempt: Some(3), ..Default::default() };

        let report = drive_range(&source, &sink, "txs", 100, 101)
            .await
            .expect("drive_range() returned an error!");

        // insert 3 failed, 4 and 5 still went through, counted exactly once
        assert_eq!(report, IngestReport { blocks: 1, inserted: 4, failed: 1 });

        let keys: Vec<_> = sink
            .inserted
            .lock()
            .expect("poisoned lock")
            .iter()
            .map(|(_, doc)| doc["_id"].as_str().expect("no _id").to_string())
            .collect();
        assert_eq!(keys, vec!["0x1", "0x2", "0x4", "0x5"]);
    }

    #[tokio::test]
    async fn test_drive_range_counts_malformed_records() {
        let source =
            FakeLedger::new(vec![(100, vec![tx("0x1"), json!({"from": "0x1111"}), tx("0x2")])]);
        let sink = RecordingSink::default();

        let report = drive_range(&source, &sink, "txs", 100, 101)
            .await
            .expect("drive_range() returned an error!");

        assert_eq!(report, IngestReport { blocks: 1, inserted: 2, failed: 1 });
    }

    #[tokio::test]
    async fn test_drive_range_aborts_on_expired_token() {
        let source = FakeLedger::new(vec![(100, vec![tx("0x1"), tx("0x2"), tx("0x3")])]);
        let sink = RecordingSink { expire_at_attempt: Some(2), ..Default::default() };

        let result = drive_range(&source, &sink, "txs", 100, 101).await;

        assert!(result.is_err());
        assert_eq!(sink.inserted.lock().expect("poisoned lock").len(), 1);
    }

    #[tokio::test]
    async fn test_drive_range_empty_range_is_a_noop() {
        let source = FakeLedger::new(vec![(100, vec![tx("0x1")])]);
        let sink = RecordingSink::default();

        let report = drive_range(&source, &sink, "txs", 100, 100)
            .await
            .expect("drive_range() returned an error!");

        assert_eq!(report, IngestReport::default());
        assert_eq!(*source.fetches.lock().expect("poisoned lock"), 0);
        assert_eq!(*sink.attempts.lock().expect("poisoned lock"), 0);
    }

    #[tokio::test]
    async fn test_drive_range_aborts_on_missing_block() {
        let source = FakeLedger::new(vec![(100, vec![tx("0x1")])]);
        let sink = RecordingSink::default();

        let result = drive_range(&source, &sink, "txs", 100, 103).await;

        assert!(result.is_err());
    }
}
