//! Single-flight driver for the reconciliation engine.

use crate::{ReconcileError, ReconciliationEngine, TickOutcome};
use blockstream_client::ChainProvider;
use blockstream_publisher::EventPublisher;
use blockstream_storage::ChainStateStore;
use std::time::Duration;
use tokio::{
    sync::Mutex,
    time::{Instant, sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Configuration of the [`PollDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// The pause between the end of one tick and the start of the next.
    pub poll_interval: Duration,
    /// A tick is only started when at least this much time is left.
    pub min_tick_budget: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(1), min_tick_budget: Duration::from_secs(3) }
    }
}

/// The time budget of a [`PollDriver::run`] invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    deadline: Option<Instant>,
}

impl TickContext {
    /// A context without a deadline.
    pub const fn unbounded() -> Self {
        Self { deadline: None }
    }

    /// A context that ends at `deadline`.
    pub const fn with_deadline(deadline: Instant) -> Self {
        Self { deadline: Some(deadline) }
    }

    /// A context that ends `budget` from now.
    pub fn with_budget(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    /// Returns the time left, or `None` if unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true if at least `needed` is left.
    pub fn has_budget(&self, needed: Duration) -> bool {
        self.remaining().is_none_or(|remaining| remaining >= needed)
    }
}

/// Counters over one [`PollDriver::run`] invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    /// Ticks that completed.
    pub ticks: u64,
    /// Ticks that failed with a transient error.
    pub failed_ticks: u64,
    /// Blocks announced as added.
    pub announced: u64,
    /// Blocks announced as removed.
    pub removed: u64,
}

impl DriverSummary {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        self.announced += outcome.announced.len() as u64;
        self.removed += outcome.removed.len() as u64;
    }
}

/// Runs [`ReconciliationEngine`] ticks one at a time.
///
/// The engine sits behind a mutex: a tick starts only once the previous one
/// finished, whether it was started by [`run`](Self::run) or [`tick`](Self::tick).
#[derive(Debug)]
pub struct PollDriver<C, S, P> {
    engine: Mutex<ReconciliationEngine<C, S, P>>,
    config: DriverConfig,
}

impl<C, S, P> PollDriver<C, S, P>
where
    C: ChainProvider,
    S: ChainStateStore,
    P: EventPublisher,
{
    /// Creates a new [`PollDriver`].
    pub fn new(engine: ReconciliationEngine<C, S, P>, config: DriverConfig) -> Self {
        Self { engine: Mutex::new(engine), config }
    }

    /// Runs a single tick, waiting for any tick in progress to finish first.
    pub async fn tick(&self) -> Result<TickOutcome, ReconcileError> {
        let engine = self.engine.lock().await;
        engine.tick().await
    }

    /// Runs ticks until the budget of `ctx` runs short or `cancel` fires.
    ///
    /// The budget is only checked before a tick starts; a started tick always
    /// runs to completion. Transient errors are logged and retried on the next
    /// tick. The first fatal error stops the driver and is returned.
    pub async fn run(
        &self,
        ctx: TickContext,
        cancel: CancellationToken,
    ) -> Result<DriverSummary, ReconcileError> {
        let mut summary = DriverSummary::default();

        loop {
            if cancel.is_cancelled() {
                info!(target: "blockstream::driver", "Cancelled, stopping");
                break;
            }
            if !ctx.has_budget(self.config.min_tick_budget) {
                info!(
                    target: "blockstream::driver",
                    remaining = ?ctx.remaining(),
                    "Insufficient time left for a tick, stopping"
                );
                break;
            }

            match self.tick().await {
                Ok(outcome) => {
                    debug!(
                        target: "blockstream::driver",
                        kind = ?outcome.kind,
                        tip = %outcome.new_tip,
                        "Tick complete"
                    );
                    summary.record(&outcome);
                }
                Err(err) if err.is_fatal() => {
                    error!(target: "blockstream::driver", %err, "Fatal reconciliation error");
                    return Err(err);
                }
                Err(err) => {
                    warn!(target: "blockstream::driver", %err, "Tick failed, retrying");
                    summary.failed_ticks += 1;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(self.config.poll_interval) => {}
            }
        }

        Ok(summary)
    }
}
