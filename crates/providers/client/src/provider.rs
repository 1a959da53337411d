use crate::ClientError;
use async_trait::async_trait;
use blockstream_schema::{BlockRef, LogEntry};
use std::{fmt::Debug, sync::Arc};

/// Validated chain data, as consumed by the reconciliation engine.
#[async_trait]
pub trait ChainProvider: Debug + Send + Sync {
    /// Returns the node's current best block.
    async fn fetch_head(&self) -> Result<BlockRef, ClientError>;

    /// Returns the canonical block at `number`, or `None` if the node has none.
    async fn fetch_block_by_number(&self, number: u64) -> Result<Option<BlockRef>, ClientError>;

    /// Returns the logs of the canonical block at `number`.
    async fn fetch_logs(&self, number: u64) -> Result<Vec<LogEntry>, ClientError>;
}

#[async_trait]
impl<P: ChainProvider + ?Sized> ChainProvider for Arc<P> {
    async fn fetch_head(&self) -> Result<BlockRef, ClientError> {
        (**self).fetch_head().await
    }

    async fn fetch_block_by_number(&self, number: u64) -> Result<Option<BlockRef>, ClientError> {
        (**self).fetch_block_by_number(number).await
    }

    async fn fetch_logs(&self, number: u64) -> Result<Vec<LogEntry>, ClientError> {
        (**self).fetch_logs(number).await
    }
}
