//! Test utilities for the reconciliation engine.

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use blockstream_client::{ChainProvider, ClientError};
use blockstream_schema::{BlockRef, LogEntry};
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Returns a deterministic hash for block `number` on `fork`.
pub fn block_hash(number: u64, fork: u8) -> B256 {
    let mut hash = B256::repeat_byte(fork);
    hash[24..].copy_from_slice(&number.to_be_bytes());
    hash
}

/// Returns the linked blocks `from..=to` of `fork`, whose first block links to
/// block `from - 1` of `parent_fork`.
pub fn fork_blocks(from: u64, to: u64, fork: u8, parent_fork: u8) -> Vec<BlockRef> {
    (from..=to)
        .map(|number| {
            let parent_fork = if number == from { parent_fork } else { fork };
            let parent_hash =
                number.checked_sub(1).map_or(B256::ZERO, |parent| block_hash(parent, parent_fork));
            BlockRef::new(number, block_hash(number, fork), parent_hash)
        })
        .collect()
}

/// Returns the linked blocks `from..=to` of the canonical fork `0`.
pub fn canonical_blocks(from: u64, to: u64) -> Vec<BlockRef> {
    fork_blocks(from, to, 0, 0)
}

/// An in-memory chain served through [`ChainProvider`].
///
/// Blocks are keyed by number; the head is the highest block. Every block has
/// `logs_per_block` logs.
#[derive(Debug)]
pub struct MockChain {
    blocks: Mutex<BTreeMap<u64, BlockRef>>,
    logs_per_block: usize,
    unavailable: AtomicBool,
    block_requests: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(BTreeMap::new()),
            logs_per_block: 2,
            unavailable: AtomicBool::new(false),
            block_requests: AtomicUsize::new(0),
        }
    }

    /// Creates a chain holding the canonical blocks `0..=head`.
    pub fn with_head(head: u64) -> Self {
        let chain = Self::new();
        chain.insert(canonical_blocks(0, head));
        chain
    }

    /// Inserts or replaces blocks.
    pub fn insert(&self, blocks: impl IntoIterator<Item = BlockRef>) {
        let mut map = self.blocks.lock().unwrap();
        map.extend(blocks.into_iter().map(|block| (block.number, block)));
    }

    /// Extends the canonical fork up to `head`.
    pub fn advance_to(&self, head: u64) {
        let tip = self.head().number;
        let fork = self.head().hash[0];
        self.insert(fork_blocks(tip + 1, head, fork, fork));
    }

    /// Replaces everything above `ancestor` with blocks of `fork` up to `head`.
    pub fn reorg(&self, ancestor: u64, head: u64, fork: u8) {
        let parent_fork = self.blocks.lock().unwrap()[&ancestor].hash[0];
        self.truncate(ancestor);
        self.insert(fork_blocks(ancestor + 1, head, fork, parent_fork));
    }

    /// Drops every block above `head`.
    pub fn truncate(&self, head: u64) {
        self.blocks.lock().unwrap().split_off(&(head + 1));
    }

    /// Makes every request fail as if the node were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the current head.
    pub fn head(&self) -> BlockRef {
        *self.blocks.lock().unwrap().values().next_back().unwrap()
    }

    /// Returns the block at `number`.
    pub fn block(&self, number: u64) -> BlockRef {
        self.blocks.lock().unwrap()[&number]
    }

    /// Returns the number of block-by-number requests served.
    pub fn block_requests(&self) -> usize {
        self.block_requests.load(Ordering::SeqCst)
    }

    fn check_available(&self, method: &'static str) -> Result<(), ClientError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout { method, timeout: Duration::from_secs(5) });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn fetch_head(&self) -> Result<BlockRef, ClientError> {
        self.check_available("eth_getBlockByNumber")?;
        Ok(self.head())
    }

    async fn fetch_block_by_number(&self, number: u64) -> Result<Option<BlockRef>, ClientError> {
        self.check_available("eth_getBlockByNumber")?;
        self.block_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.blocks.lock().unwrap().get(&number).copied())
    }

    async fn fetch_logs(&self, number: u64) -> Result<Vec<LogEntry>, ClientError> {
        self.check_available("eth_getLogs")?;
        let Some(block) = self.blocks.lock().unwrap().get(&number).copied() else {
            return Ok(Vec::new());
        };

        Ok((0..self.logs_per_block as u64)
            .map(|log_index| LogEntry {
                address: Address::repeat_byte(0x11),
                topics: vec![B256::repeat_byte(0x22)],
                data: Bytes::new(),
                block_number: block.number,
                block_hash: block.hash,
                transaction_hash: B256::with_last_byte(log_index as u8),
                transaction_index: log_index,
                log_index,
                removed: false,
            })
            .collect())
    }
}
