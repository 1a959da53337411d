use blockstream_core::{DriverConfig, EngineConfig, TickContext};
use clap::Parser;
use std::{num::NonZeroU64, time::Duration};

/// Reconciliation arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct EngineArgs {
    /// Number of blocks a block must be buried under before it is announced.
    #[arg(long = "num-blocks-delay", env = "NUM_BLOCKS_DELAY")]
    pub num_blocks_delay: NonZeroU64,
    /// Number of blocks tracked beyond the delay to detect reorgs.
    #[arg(long = "reorg-window", env = "REORG_WINDOW", default_value = "64")]
    pub reorg_window: NonZeroU64,
    /// Maximum number of blocks a single tick advances the tip by.
    #[arg(long = "max-blocks-per-tick", env = "MAX_BLOCKS_PER_TICK", default_value = "128")]
    pub max_blocks_per_tick: NonZeroU64,
    /// Pause between ticks, in milliseconds.
    #[arg(
        long = "poll-interval-ms",
        env = "POLL_INTERVAL_MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: u64,
    /// How long to run, in seconds. `0` runs until interrupted.
    #[arg(long = "time-budget-secs", env = "TIME_BUDGET_SECS", default_value_t = 0)]
    pub time_budget_secs: u64,
}

impl EngineArgs {
    /// Returns the engine configuration.
    pub const fn engine_config(&self, call_timeout: Duration) -> EngineConfig {
        EngineConfig::new(self.num_blocks_delay)
            .with_reorg_window(self.reorg_window)
            .with_max_blocks_per_tick(self.max_blocks_per_tick)
            .with_call_timeout(call_timeout)
    }

    /// Returns the driver configuration.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..Default::default()
        }
    }

    /// Returns the time budget of the run.
    pub fn tick_context(&self) -> TickContext {
        match self.time_budget_secs {
            0 => TickContext::unbounded(),
            secs => TickContext::with_budget(Duration::from_secs(secs)),
        }
    }
}
