use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// Chain state storage arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct StorageArgs {
    /// Root directory for the chain state and the queues.
    #[arg(long = "datadir", env = "DATADIR", default_value = "data")]
    pub datadir: PathBuf,
    /// Name of the chain state record.
    #[arg(long = "state-record", env = "BLOCKSTREAM_STATE_TABLE", default_value = "blockstream-state")]
    pub state_record: String,
    /// Time-to-live of the chain state record, in milliseconds. An expired
    /// record is ignored and the stream bootstraps again from the head.
    #[arg(
        long = "block-data-ttl-ms",
        env = "BLOCK_DATA_TTL_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub block_data_ttl_ms: u64,
}

impl StorageArgs {
    /// Returns the record time-to-live.
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.block_data_ttl_ms)
    }

    /// Returns the directory holding the chain state record.
    pub fn state_dir(&self) -> PathBuf {
        self.datadir.join("state")
    }

    /// Returns the directory holding the queues.
    pub fn queue_dir(&self) -> PathBuf {
        self.datadir.join("queues")
    }
}
