use crate::{ChainState, StorageError};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

/// Durable storage for the single chain state record of a deployment.
///
/// Implementations must make a successful [`put`](Self::put) visible to every
/// later [`get`](Self::get). Callers serialize access: at most one
/// read-modify-write cycle runs at a time.
#[async_trait]
pub trait ChainStateStore: Debug + Send + Sync {
    /// Loads the record, or `None` if there is none yet.
    async fn get(&self) -> Result<Option<ChainState>, StorageError>;

    /// Replaces the record.
    async fn put(&self, state: &ChainState) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: ChainStateStore + ?Sized> ChainStateStore for Arc<S> {
    async fn get(&self) -> Result<Option<ChainState>, StorageError> {
        (**self).get().await
    }

    async fn put(&self, state: &ChainState) -> Result<(), StorageError> {
        (**self).put(state).await
    }
}
