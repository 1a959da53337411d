use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// A chain state violates one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainStateError {
    /// The tracked segment has no blocks.
    #[error("tracked segment is empty")]
    Empty,

    /// Two consecutive tracked blocks are not parent and child.
    #[error("block {child} does not extend block {parent}")]
    Discontinuous {
        /// The number of the earlier block.
        parent: u64,
        /// The number of the block that fails to link to it.
        child: u64,
    },

    /// The announcement watermark is past the tip.
    #[error("announcement watermark {watermark} is above the tip {tip}")]
    WatermarkAboveTip {
        /// The watermark.
        watermark: u64,
        /// The tip number.
        tip: u64,
    },

    /// The announcement watermark is below the first announceable block.
    #[error("announcement watermark {watermark} is below the first announceable block {first_announceable}")]
    WatermarkBelowFloor {
        /// The watermark.
        watermark: u64,
        /// The first announceable block number.
        first_announceable: u64,
    },
}

/// Errors that may occur while reading or writing the chain state record.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The state violates its invariants.
    #[error(transparent)]
    InvalidState(#[from] ChainStateError),

    /// The record could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The record path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record exists but could not be decoded.
    #[error("corrupt state record {}: {source}", path.display())]
    Corrupt {
        /// The record path.
        path: PathBuf,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The operation did not complete in time.
    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StorageError {
    /// Returns true if retrying the operation later may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Timeout(_))
    }
}
