use crate::{BlockEvent, EventPublisher, LogDrainTrigger, LogsAvailable, PublishError};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::trace;

/// The receiving halves of a [`ChannelPublisher`].
#[derive(Debug)]
pub struct PublisherReceivers {
    /// New-block events.
    pub new_blocks: mpsc::Receiver<BlockEvent>,
    /// Log firehose notifications.
    pub log_firehose: mpsc::Receiver<LogsAvailable>,
    /// Log drain triggers.
    pub log_drain: mpsc::Receiver<LogDrainTrigger>,
}

/// An [`EventPublisher`] over bounded in-process channels.
///
/// Publishing waits for capacity when a channel is full, so a stalled consumer
/// applies back-pressure to the caller.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    new_blocks: mpsc::Sender<BlockEvent>,
    log_firehose: mpsc::Sender<LogsAvailable>,
    log_drain: mpsc::Sender<LogDrainTrigger>,
}

impl ChannelPublisher {
    /// Creates a publisher whose channels each buffer `capacity` messages.
    pub fn new(capacity: usize) -> (Self, PublisherReceivers) {
        let (new_blocks, new_blocks_rx) = mpsc::channel(capacity);
        let (log_firehose, log_firehose_rx) = mpsc::channel(capacity);
        let (log_drain, log_drain_rx) = mpsc::channel(capacity);

        (
            Self { new_blocks, log_firehose, log_drain },
            PublisherReceivers {
                new_blocks: new_blocks_rx,
                log_firehose: log_firehose_rx,
                log_drain: log_drain_rx,
            },
        )
    }
}

#[async_trait]
impl EventPublisher for ChannelPublisher {
    async fn publish_new_block(&self, event: BlockEvent) -> Result<(), PublishError> {
        trace!(target: "blockstream::publisher", %event, "Publishing block event");
        self.new_blocks
            .send(event)
            .await
            .map_err(|_| PublishError::ChannelClosed { channel: "new-block" })
    }

    async fn publish_logs_available(&self, notification: LogsAvailable) -> Result<(), PublishError> {
        self.log_firehose
            .send(notification)
            .await
            .map_err(|_| PublishError::ChannelClosed { channel: "log-firehose" })
    }

    async fn trigger_log_drain(&self, block_number: u64) -> Result<(), PublishError> {
        self.log_drain
            .send(LogDrainTrigger { block_number })
            .await
            .map_err(|_| PublishError::ChannelClosed { channel: "log-drain" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use blockstream_schema::BlockRef;

    #[tokio::test]
    async fn test_publish_in_order() {
        let (publisher, mut receivers) = ChannelPublisher::new(8);
        let block = |n| BlockRef::new(n, B256::with_last_byte(n as u8), B256::ZERO);

        publisher.publish_new_block(BlockEvent::Removed { block: block(2) }).await.unwrap();
        publisher.publish_new_block(BlockEvent::Added { block: block(2) }).await.unwrap();
        publisher.publish_logs_available(LogsAvailable { block: block(2), log_count: 3 }).await.unwrap();
        publisher.trigger_log_drain(2).await.unwrap();

        assert!(!receivers.new_blocks.recv().await.unwrap().is_added());
        assert!(receivers.new_blocks.recv().await.unwrap().is_added());
        assert_eq!(receivers.log_firehose.recv().await.unwrap().log_count, 3);
        assert_eq!(receivers.log_drain.recv().await.unwrap().block_number, 2);
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let (publisher, receivers) = ChannelPublisher::new(1);
        drop(receivers);

        let err = publisher.trigger_log_drain(1).await.unwrap_err();
        assert!(matches!(err, PublishError::ChannelClosed { channel: "log-drain" }));
    }
}
