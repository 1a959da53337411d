//! Engine configuration.

use std::{num::NonZeroU64, time::Duration};

/// Configuration of the [`ReconciliationEngine`](crate::ReconciliationEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    num_blocks_delay: NonZeroU64,
    reorg_window: NonZeroU64,
    max_blocks_per_tick: NonZeroU64,
    call_timeout: Duration,
}

impl EngineConfig {
    /// The default number of blocks tracked beyond the confirmation delay.
    pub const DEFAULT_REORG_WINDOW: NonZeroU64 = NonZeroU64::new(64).unwrap();

    /// The default cap on the number of blocks a single tick catches up.
    pub const DEFAULT_MAX_BLOCKS_PER_TICK: NonZeroU64 = NonZeroU64::new(128).unwrap();

    /// The default timeout for store and publisher calls.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new [`EngineConfig`] with the given confirmation delay.
    ///
    /// A block is announced once the head is at least `num_blocks_delay`
    /// blocks ahead of it.
    pub const fn new(num_blocks_delay: NonZeroU64) -> Self {
        Self {
            num_blocks_delay,
            reorg_window: Self::DEFAULT_REORG_WINDOW,
            max_blocks_per_tick: Self::DEFAULT_MAX_BLOCKS_PER_TICK,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the number of blocks tracked beyond the confirmation delay.
    pub const fn with_reorg_window(mut self, reorg_window: NonZeroU64) -> Self {
        self.reorg_window = reorg_window;
        self
    }

    /// Sets the catch-up cap.
    pub const fn with_max_blocks_per_tick(mut self, max_blocks_per_tick: NonZeroU64) -> Self {
        self.max_blocks_per_tick = max_blocks_per_tick;
        self
    }

    /// Sets the timeout for store and publisher calls.
    pub const fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Returns the confirmation delay.
    pub const fn num_blocks_delay(&self) -> u64 {
        self.num_blocks_delay.get()
    }

    /// Returns the reorg window.
    pub const fn reorg_window(&self) -> u64 {
        self.reorg_window.get()
    }

    /// Returns the catch-up cap.
    pub const fn max_blocks_per_tick(&self) -> u64 {
        self.max_blocks_per_tick.get()
    }

    /// Returns the store and publisher call timeout.
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Returns the number of blocks kept in the tracked window.
    pub const fn window(&self) -> u64 {
        self.num_blocks_delay().saturating_add(self.reorg_window())
    }

    /// Returns true if `number` is deep enough below `head` to be announced.
    pub const fn is_confirmed(&self, number: u64, head: u64) -> bool {
        head >= number && head - number >= self.num_blocks_delay()
    }
}
