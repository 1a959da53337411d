use crate::{BlockEvent, LogsAvailable, PublishError};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

/// At-least-once delivery of chain events.
///
/// A successful return means the message is durably accepted by the channel.
/// Messages published by one caller are delivered in publication order.
#[async_trait]
pub trait EventPublisher: Debug + Send + Sync {
    /// Publishes to the new-block channel.
    async fn publish_new_block(&self, event: BlockEvent) -> Result<(), PublishError>;

    /// Publishes to the log firehose.
    async fn publish_logs_available(&self, notification: LogsAvailable) -> Result<(), PublishError>;

    /// Wakes the task that drains the log firehose.
    async fn trigger_log_drain(&self, block_number: u64) -> Result<(), PublishError>;
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
    async fn publish_new_block(&self, event: BlockEvent) -> Result<(), PublishError> {
        (**self).publish_new_block(event).await
    }

    async fn publish_logs_available(&self, notification: LogsAvailable) -> Result<(), PublishError> {
        (**self).publish_logs_available(notification).await
    }

    async fn trigger_log_drain(&self, block_number: u64) -> Result<(), PublishError> {
        (**self).trigger_log_drain(block_number).await
    }
}
