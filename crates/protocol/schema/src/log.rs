//! Log entries returned by `eth_getLogs`.

use crate::{SchemaError, hex};
use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use serde_json::Value;

const SHAPE: &str = "log";

/// The maximum number of topics an EVM log can carry.
pub const MAX_TOPICS: usize = 4;

/// A log entry emitted in a block.
///
/// Only used to confirm that the logs of a block are available before the block
/// is announced on the log firehose; the log data itself is never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// The emitting contract.
    #[serde(deserialize_with = "hex::address::deserialize")]
    pub address: Address,
    /// Indexed topics.
    #[serde(deserialize_with = "topics")]
    pub topics: Vec<B256>,
    /// Non-indexed data.
    #[serde(deserialize_with = "hex::data::deserialize")]
    pub data: Bytes,
    /// The number of the block containing the log.
    #[serde(with = "hex::quantity")]
    pub block_number: u64,
    /// The hash of the block containing the log.
    #[serde(deserialize_with = "hex::hash::deserialize")]
    pub block_hash: B256,
    /// The hash of the transaction that emitted the log.
    #[serde(deserialize_with = "hex::hash::deserialize")]
    pub transaction_hash: B256,
    /// The index of that transaction in the block.
    #[serde(with = "hex::quantity")]
    pub transaction_index: u64,
    /// The index of the log in the block.
    #[serde(with = "hex::quantity")]
    pub log_index: u64,
    /// Set by the node when the log was dropped by a reorg.
    pub removed: bool,
}

fn topics<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<B256>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;
    if raw.len() > MAX_TOPICS {
        return Err(D::Error::custom(format!(
            "expected at most {MAX_TOPICS} topics, got {}",
            raw.len()
        )));
    }
    raw.iter().map(|topic| hex::parse_hash(topic).map_err(D::Error::custom)).collect()
}

/// Decodes the logs of a single block.
///
/// Every entry must decode, must belong to `block_number`, and must not be flagged
/// as removed. A `null` result is rejected: nodes answer an empty block with `[]`.
pub fn decode_logs(value: &Value, block_number: u64) -> Result<Vec<LogEntry>, SchemaError> {
    if value.is_null() {
        return Err(SchemaError::Null { shape: SHAPE });
    }
    let logs = Vec::<LogEntry>::deserialize(value).map_err(|err| SchemaError::malformed(SHAPE, err))?;

    for log in &logs {
        if log.block_number != block_number {
            return Err(SchemaError::Mismatch {
                shape: SHAPE,
                field: "blockNumber",
                expected: block_number.to_string(),
                actual: log.block_number.to_string(),
            });
        }
        if log.removed {
            return Err(SchemaError::invalid(
                SHAPE,
                format!("log {} of block {block_number} is flagged as removed", log.log_index),
            ));
        }
    }

    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_json(block_number: &str, topics: usize) -> Value {
        json!({
            "address": format!("0x{}", "11".repeat(20)),
            "topics": vec![format!("0x{}", "22".repeat(32)); topics],
            "data": "0xdeadbeef",
            "blockNumber": block_number,
            "blockHash": format!("0x{}", "33".repeat(32)),
            "transactionHash": format!("0x{}", "44".repeat(32)),
            "transactionIndex": "0x0",
            "logIndex": "0x1",
            "removed": false
        })
    }

    #[test]
    fn test_decode_logs() {
        let logs = decode_logs(&json!([log_json("0x64", 2), log_json("0x64", 0)]), 100).unwrap();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].topics.len(), 2);
        assert_eq!(logs[0].data, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(logs[0].block_hash, B256::repeat_byte(0x33));
    }

    #[test]
    fn test_decode_empty_logs() {
        assert!(decode_logs(&json!([]), 7).unwrap().is_empty());
        assert!(matches!(decode_logs(&Value::Null, 7), Err(SchemaError::Null { .. })));
    }

    #[test]
    fn test_decode_logs_rejects_foreign_block() {
        let err = decode_logs(&json!([log_json("0x65", 1)]), 100).unwrap_err();
        assert!(matches!(err, SchemaError::Mismatch { field: "blockNumber", .. }));
    }

    #[test]
    fn test_decode_logs_rejects_too_many_topics() {
        assert!(decode_logs(&json!([log_json("0x64", 5)]), 100).is_err());
    }

    #[test]
    fn test_decode_logs_rejects_removed() {
        let mut log = log_json("0x64", 1);
        log["removed"] = json!(true);
        assert!(matches!(decode_logs(&json!([log]), 100), Err(SchemaError::Invalid { .. })));
    }
}
