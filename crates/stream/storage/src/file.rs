use crate::{ChainState, ChainStateStore, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// The on-disk form of the chain state record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord {
    state: ChainState,
    updated_at_ms: u64,
}

fn now_ms() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// A [`ChainStateStore`] backed by a JSON file.
///
/// The record lives at `<dir>/<record_name>.json`. Writes go to a sibling
/// temporary file which is synced and then renamed over the record, so a reader
/// observes either the previous or the new record, never a torn one. Records
/// older than the time-to-live are reported as absent.
#[derive(Debug, Clone)]
pub struct FileChainStateStore {
    path: PathBuf,
    ttl: Duration,
}

impl FileChainStateStore {
    /// Opens the store, creating `dir` if needed.
    pub async fn open(
        dir: impl AsRef<Path>,
        record_name: &str,
        ttl: Duration,
    ) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|source| StorageError::Io { path: dir.to_path_buf(), source })?;

        let path = dir.join(format!("{record_name}.json"));
        info!(target: "blockstream::storage", path = %path.display(), ?ttl, "Opened chain state store");
        Ok(Self { path, ttl })
    }

    /// Returns the record path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

#[async_trait]
impl ChainStateStore for FileChainStateStore {
    async fn get(&self) -> Result<Option<ChainState>, StorageError> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        let record: StateRecord = serde_json::from_slice(&contents)
            .map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })?;

        let age = Duration::from_millis(now_ms().saturating_sub(record.updated_at_ms));
        if age > self.ttl {
            debug!(
                target: "blockstream::storage",
                ?age,
                ttl = ?self.ttl,
                "Chain state record expired"
            );
            return Ok(None);
        }

        Ok(Some(record.state))
    }

    async fn put(&self, state: &ChainState) -> Result<(), StorageError> {
        state.validate()?;

        let record = StateRecord { state: state.clone(), updated_at_ms: now_ms() };
        let contents = serde_json::to_vec_pretty(&record)
            .map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).await.map_err(|err| self.io_error(err))?;
        file.write_all(&contents).await.map_err(|err| self.io_error(err))?;
        file.sync_all().await.map_err(|err| self.io_error(err))?;
        drop(file);

        fs::rename(&tmp, &self.path).await.map_err(|err| self.io_error(err))?;
        debug!(
            target: "blockstream::storage",
            tip = state.tip().number,
            tracked = state.tracked().len(),
            "Persisted chain state"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use blockstream_schema::BlockRef;

    const TTL: Duration = Duration::from_secs(3600);

    fn state(tip: u64) -> ChainState {
        let blocks = (tip - 2..=tip)
            .map(|n| BlockRef::new(n, B256::with_last_byte(n as u8), B256::with_last_byte(n as u8 - 1)))
            .collect();
        ChainState::new(blocks, Some(tip - 2)).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStateStore::open(dir.path(), "state", TTL).await.unwrap();

        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStateStore::open(dir.path().join("nested"), "state", TTL).await.unwrap();

        store.put(&state(10)).await.unwrap();
        store.put(&state(12)).await.unwrap();

        assert_eq!(store.get().await.unwrap(), Some(state(12)));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_expired_record_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStateStore::open(dir.path(), "state", TTL).await.unwrap();

        let record = StateRecord { state: state(10), updated_at_ms: 0 };
        std::fs::write(store.path(), serde_json::to_vec(&record).unwrap()).unwrap();

        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStateStore::open(dir.path(), "state", TTL).await.unwrap();
        std::fs::write(store.path(), b"{ not json").unwrap();

        assert!(matches!(store.get().await, Err(StorageError::Corrupt { .. })));
    }
}
