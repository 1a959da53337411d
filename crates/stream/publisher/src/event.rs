use blockstream_schema::BlockRef;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A change to the announced chain.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockEvent {
    /// The block became final enough to announce.
    #[display("added {block}")]
    Added {
        /// The announced block.
        block: BlockRef,
    },
    /// A previously announced block was reorganized out.
    #[display("removed {block}")]
    Removed {
        /// The retracted block.
        block: BlockRef,
    },
}

impl BlockEvent {
    /// Returns the block the event refers to.
    pub const fn block(&self) -> &BlockRef {
        match self {
            Self::Added { block } | Self::Removed { block } => block,
        }
    }

    /// Returns true for [`BlockEvent::Added`].
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Notification that the logs of an announced block can be drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsAvailable {
    /// The announced block.
    pub block: BlockRef,
    /// The number of logs the node reported for it.
    pub log_count: usize,
}

/// Request for the downstream task that drains the log firehose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDrainTrigger {
    /// The block whose logs were made available.
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn test_block_event_wire_format() {
        let block = BlockRef::new(16, B256::repeat_byte(1), B256::repeat_byte(2));
        let json = serde_json::to_value(BlockEvent::Removed { block }).unwrap();

        assert_eq!(json["kind"], "removed");
        assert_eq!(json["block"]["number"], "0x10");
        assert_eq!(serde_json::from_value::<BlockEvent>(json).unwrap().block(), &block);
    }
}
