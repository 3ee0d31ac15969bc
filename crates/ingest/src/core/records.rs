use crate::error::Error;
use eyre::eyre;
use serde_json::Value;

/// Turn an extracted transaction record into the document to insert.
///
/// The sink is keyed: every document carries an `_id` equal to the
/// transaction's `hash` field. All ledger fields pass through unmodified,
/// nested structures included. A record without a hash cannot be keyed and
/// is rejected.
pub(crate) fn to_document(transaction: Value) -> Result<Value, Error> {
    let hash = transaction
        .get("hash")
        .and_then(|hash| hash.as_str())
        .ok_or_else(|| eyre!("transaction record is missing its 'hash' field"))?
        .to_string();

    let mut document = transaction;
    document
        .as_object_mut()
        .ok_or_else(|| eyre!("transaction record is not a JSON object"))?
        .insert("_id".to_string(), Value::String(hash));

    Ok(document)
}
