use crate::{ChainState, ChainStateStore, StorageError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// A [`ChainStateStore`] that keeps the record in memory.
#[derive(Debug, Default)]
pub struct InMemoryChainStateStore {
    state: RwLock<Option<ChainState>>,
}

impl InMemoryChainStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `state`.
    pub fn with_state(state: ChainState) -> Self {
        Self { state: RwLock::new(Some(state)) }
    }
}

#[async_trait]
impl ChainStateStore for InMemoryChainStateStore {
    async fn get(&self) -> Result<Option<ChainState>, StorageError> {
        Ok(self.state.read().await.clone())
    }

    async fn put(&self, state: &ChainState) -> Result<(), StorageError> {
        state.validate()?;
        *self.state.write().await = Some(state.clone());
        Ok(())
    }
}
