use crate::{BlockEvent, EventPublisher, LogDrainTrigger, LogsAvailable, PublishError};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// Names of the queues a [`FileQueuePublisher`] writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueNames {
    /// The new-block queue.
    pub new_block: String,
    /// The log firehose queue.
    pub log_firehose: String,
    /// The log drain task's trigger queue.
    pub log_drain: String,
}

impl Default for QueueNames {
    fn default() -> Self {
        Self {
            new_block: "new-block-queue".to_string(),
            log_firehose: "log-firehose-queue".to_string(),
            log_drain: "drain-block-queue".to_string(),
        }
    }
}

/// An [`EventPublisher`] writing durable, append-only JSON-lines queues.
///
/// Each queue is a file `<dir>/<name>.jsonl`; every message is one line, synced
/// to disk before the publish call returns.
#[derive(Debug, Clone)]
pub struct FileQueuePublisher {
    new_block: PathBuf,
    log_firehose: PathBuf,
    log_drain: PathBuf,
}

impl FileQueuePublisher {
    /// Opens the queues under `dir`, creating it if needed.
    pub async fn open(dir: impl AsRef<Path>, names: &QueueNames) -> Result<Self, PublishError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|source| PublishError::Io { path: dir.to_path_buf(), source })?;

        let queue = |name: &str| dir.join(format!("{name}.jsonl"));
        let publisher = Self {
            new_block: queue(&names.new_block),
            log_firehose: queue(&names.log_firehose),
            log_drain: queue(&names.log_drain),
        };
        info!(target: "blockstream::publisher", dir = %dir.display(), "Opened file queues");
        Ok(publisher)
    }

    /// Returns the path of the new-block queue.
    pub fn new_block_path(&self) -> &Path {
        &self.new_block
    }

    /// Returns the path of the log firehose queue.
    pub fn log_firehose_path(&self) -> &Path {
        &self.log_firehose
    }

    /// Returns the path of the log drain queue.
    pub fn log_drain_path(&self) -> &Path {
        &self.log_drain
    }

    async fn append<T: Serialize + Sync>(path: &Path, message: &T) -> Result<(), PublishError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');

        let io_error = |source| PublishError::Io { path: path.to_path_buf(), source };
        let mut file =
            fs::OpenOptions::new().create(true).append(true).open(path).await.map_err(io_error)?;
        file.write_all(&line).await.map_err(io_error)?;
        file.sync_data().await.map_err(io_error)?;

        debug!(target: "blockstream::publisher", queue = %path.display(), "Appended message");
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for FileQueuePublisher {
    async fn publish_new_block(&self, event: BlockEvent) -> Result<(), PublishError> {
        Self::append(&self.new_block, &event).await
    }

    async fn publish_logs_available(&self, notification: LogsAvailable) -> Result<(), PublishError> {
        Self::append(&self.log_firehose, &notification).await
    }

    async fn trigger_log_drain(&self, block_number: u64) -> Result<(), PublishError> {
        Self::append(&self.log_drain, &LogDrainTrigger { block_number }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use blockstream_schema::BlockRef;

    fn read_lines<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_appends_one_line_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FileQueuePublisher::open(dir.path(), &QueueNames::default()).await.unwrap();
        let block = BlockRef::new(7, B256::repeat_byte(7), B256::repeat_byte(6));

        publisher.publish_new_block(BlockEvent::Added { block }).await.unwrap();
        publisher.publish_new_block(BlockEvent::Removed { block }).await.unwrap();
        publisher.publish_logs_available(LogsAvailable { block, log_count: 0 }).await.unwrap();
        publisher.trigger_log_drain(7).await.unwrap();

        let events: Vec<BlockEvent> = read_lines(publisher.new_block_path());
        assert_eq!(events, vec![BlockEvent::Added { block }, BlockEvent::Removed { block }]);

        let logs: Vec<LogsAvailable> = read_lines(publisher.log_firehose_path());
        assert_eq!(logs, vec![LogsAvailable { block, log_count: 0 }]);

        let triggers: Vec<LogDrainTrigger> = read_lines(publisher.log_drain_path());
        assert_eq!(triggers, vec![LogDrainTrigger { block_number: 7 }]);
    }

    #[tokio::test]
    async fn test_custom_queue_names() {
        let dir = tempfile::tempdir().unwrap();
        let names = QueueNames {
            new_block: "blocks".into(),
            log_firehose: "firehose".into(),
            log_drain: "drain".into(),
        };
        let publisher = FileQueuePublisher::open(dir.path(), &names).await.unwrap();
        publisher.trigger_log_drain(1).await.unwrap();

        assert!(dir.path().join("drain.jsonl").exists());
        assert!(!dir.path().join("blocks.jsonl").exists());
    }
}
