//! Block header references.

use crate::{SchemaError, hex};
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const SHAPE: &str = "block";

/// One block header as observed from the node.
///
/// Serializes with the same field names and hex encodings as the node's block
/// object, so a [`BlockRef`] round-trips through its own JSON form and can be
/// decoded directly out of a full `eth_getBlockByNumber` response (extra fields
/// are ignored, missing or malformed ones are rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    /// The block number.
    #[serde(with = "hex::quantity")]
    pub number: u64,
    /// The block hash.
    #[serde(deserialize_with = "hex::hash::deserialize")]
    pub hash: B256,
    /// The hash of the parent block.
    #[serde(deserialize_with = "hex::hash::deserialize")]
    pub parent_hash: B256,
}

impl BlockRef {
    /// Creates a new [`BlockRef`].
    pub const fn new(number: u64, hash: B256, parent_hash: B256) -> Self {
        Self { number, hash, parent_hash }
    }

    /// Returns true if `self` is the direct parent of `child`.
    pub fn is_parent_of(&self, child: &Self) -> bool {
        self.number.checked_add(1) == Some(child.number) && self.hash == child.parent_hash
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.number, self.hash)
    }
}

/// Decodes a block object that must be present.
pub fn decode_block_ref(value: &Value) -> Result<BlockRef, SchemaError> {
    decode_optional_block_ref(value)?.ok_or(SchemaError::Null { shape: SHAPE })
}

/// Decodes a block object where `null` means the node has no such block.
pub fn decode_optional_block_ref(value: &Value) -> Result<Option<BlockRef>, SchemaError> {
    if value.is_null() {
        return Ok(None);
    }
    if !value.is_object() {
        return Err(SchemaError::invalid(SHAPE, format!("expected an object, got {value}")));
    }
    BlockRef::deserialize(value).map(Some).map_err(|err| SchemaError::malformed(SHAPE, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hash(byte: u8) -> String {
        format!("0x{}", alloy_primitives::hex::encode([byte; 32]))
    }

    #[test]
    fn test_decode_full_node_block() {
        let payload = json!({
            "number": "0x3e8",
            "hash": hash(1),
            "parentHash": hash(2),
            "miner": "0x0000000000000000000000000000000000000000",
            "transactions": [],
            "timestamp": "0x6553f100"
        });

        let block = decode_block_ref(&payload).unwrap();
        assert_eq!(block, BlockRef::new(1000, B256::repeat_byte(1), B256::repeat_byte(2)));
    }

    #[test]
    fn test_decode_null_block() {
        assert!(decode_optional_block_ref(&Value::Null).unwrap().is_none());
        assert!(matches!(decode_block_ref(&Value::Null), Err(SchemaError::Null { .. })));
    }

    #[test]
    fn test_decode_rejects_malformed_fields() {
        let missing_parent = json!({ "number": "0x1", "hash": hash(1) });
        assert!(matches!(
            decode_block_ref(&missing_parent),
            Err(SchemaError::Malformed { shape: "block", .. })
        ));

        let decimal_number = json!({ "number": 1, "hash": hash(1), "parentHash": hash(0) });
        assert!(decode_block_ref(&decimal_number).is_err());

        let short_hash = json!({ "number": "0x1", "hash": "0x1234", "parentHash": hash(0) });
        assert!(decode_block_ref(&short_hash).is_err());

        let null_hash = json!({ "number": "0x1", "hash": null, "parentHash": hash(0) });
        assert!(decode_block_ref(&null_hash).is_err());

        assert!(matches!(decode_block_ref(&json!("0x1")), Err(SchemaError::Invalid { .. })));
    }

    #[test]
    fn test_block_ref_json_round_trip() {
        let block = BlockRef::new(42, B256::repeat_byte(7), B256::repeat_byte(6));
        let encoded = serde_json::to_value(block).unwrap();
        assert_eq!(encoded["number"], "0x2a");
        assert_eq!(decode_block_ref(&encoded).unwrap(), block);
    }

    #[test]
    fn test_is_parent_of() {
        let parent = BlockRef::new(9, B256::repeat_byte(9), B256::ZERO);
        let child = BlockRef::new(10, B256::repeat_byte(10), parent.hash);
        let orphan = BlockRef::new(10, B256::repeat_byte(11), B256::repeat_byte(99));

        assert!(parent.is_parent_of(&child));
        assert!(!parent.is_parent_of(&orphan));
        assert!(!child.is_parent_of(&parent));
    }
}
