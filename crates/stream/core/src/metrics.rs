use crate::{ReconcileError, TickKind, TickOutcome};
use std::time::Duration;

/// Container for the metrics recorded by the reconciliation engine.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of ticks, labelled by outcome.
    pub const TICKS_TOTAL: &'static str = "blockstream_ticks_total";
    /// Identifier for the histogram of tick durations.
    pub const TICK_DURATION_SECONDS: &'static str = "blockstream_tick_duration_seconds";
    /// Identifier for the counter of blocks announced as added.
    pub const BLOCKS_ANNOUNCED_TOTAL: &'static str = "blockstream_blocks_announced_total";
    /// Identifier for the counter of blocks announced as removed.
    pub const BLOCKS_REMOVED_TOTAL: &'static str = "blockstream_blocks_removed_total";
    /// Identifier for the histogram of reorg depths.
    pub const REORG_DEPTH: &'static str = "blockstream_reorg_depth";
    /// Identifier for the gauge of the persisted tip number.
    pub const TIP_BLOCK_NUMBER: &'static str = "blockstream_tip_block_number";

    /// Describes and zeroes the engine metrics.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::TICKS_TOTAL,
            metrics::Unit::Count,
            "Total number of reconciliation ticks by outcome",
        );
        metrics::describe_histogram!(
            Self::TICK_DURATION_SECONDS,
            metrics::Unit::Seconds,
            "Duration of reconciliation ticks",
        );
        metrics::describe_counter!(
            Self::BLOCKS_ANNOUNCED_TOTAL,
            metrics::Unit::Count,
            "Total number of blocks announced as added",
        );
        metrics::describe_counter!(
            Self::BLOCKS_REMOVED_TOTAL,
            metrics::Unit::Count,
            "Total number of blocks announced as removed",
        );
        metrics::describe_histogram!(
            Self::REORG_DEPTH,
            metrics::Unit::Count,
            "Number of tracked blocks unwound by a reorg",
        );
        metrics::describe_gauge!(
            Self::TIP_BLOCK_NUMBER,
            metrics::Unit::Count,
            "Number of the tip of the persisted chain state",
        );
    }

    fn zero() {
        for outcome in ["bootstrap", "noop", "reconciled"] {
            metrics::counter!(Self::TICKS_TOTAL, "outcome" => outcome).increment(0);
        }
        metrics::counter!(Self::BLOCKS_ANNOUNCED_TOTAL).increment(0);
        metrics::counter!(Self::BLOCKS_REMOVED_TOTAL).increment(0);
        metrics::gauge!(Self::TIP_BLOCK_NUMBER).set(0.0);
    }

    pub(crate) fn record_tick(elapsed: Duration, result: &Result<TickOutcome, ReconcileError>) {
        metrics::histogram!(Self::TICK_DURATION_SECONDS).record(elapsed.as_secs_f64());

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                metrics::counter!(Self::TICKS_TOTAL, "outcome" => err.kind()).increment(1);
                return;
            }
        };

        let label = match outcome.kind {
            TickKind::Bootstrap => "bootstrap",
            TickKind::NoOp => "noop",
            TickKind::Reconciled => "reconciled",
        };
        metrics::counter!(Self::TICKS_TOTAL, "outcome" => label).increment(1);
        metrics::counter!(Self::BLOCKS_ANNOUNCED_TOTAL).increment(outcome.announced.len() as u64);
        metrics::counter!(Self::BLOCKS_REMOVED_TOTAL).increment(outcome.removed.len() as u64);
        metrics::gauge!(Self::TIP_BLOCK_NUMBER).set(outcome.new_tip.number as f64);

        if outcome.plan.reorg_depth() > 0 {
            metrics::histogram!(Self::REORG_DEPTH).record(outcome.plan.reorg_depth() as f64);
        }
    }
}
