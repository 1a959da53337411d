//! The reconciliation engine.

use crate::{EngineConfig, Metrics, ReconcileError, ReconciliationPlan, TickKind, TickOutcome};
use blockstream_client::ChainProvider;
use blockstream_publisher::{BlockEvent, EventPublisher, LogsAvailable, PublishError};
use blockstream_schema::BlockRef;
use blockstream_storage::{ChainState, ChainStateStore, StorageError};
use std::future::Future;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

/// Moves the tracked chain towards the node's head and announces the
/// difference.
///
/// A tick reads the last reconciled [`ChainState`], finds where it diverges
/// from the node's chain, publishes removals for announced blocks that left the
/// canonical chain and additions for blocks that reached the confirmation
/// delay, and persists the new state last. Events are therefore delivered at
/// least once: a tick that fails after publishing is replayed in full.
///
/// Ticks must not run concurrently; see [`PollDriver`](crate::PollDriver).
#[derive(Debug)]
pub struct ReconciliationEngine<C, S, P> {
    client: C,
    store: S,
    publisher: P,
    config: EngineConfig,
}

impl<C, S, P> ReconciliationEngine<C, S, P>
where
    C: ChainProvider,
    S: ChainStateStore,
    P: EventPublisher,
{
    /// Creates a new [`ReconciliationEngine`].
    pub const fn new(client: C, store: S, publisher: P, config: EngineConfig) -> Self {
        Self { client, store, publisher, config }
    }

    /// Returns the engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one reconciliation tick.
    pub async fn tick(&self) -> Result<TickOutcome, ReconcileError> {
        let start = Instant::now();
        let result = self.reconcile().await;
        Metrics::record_tick(start.elapsed(), &result);
        result
    }

    async fn reconcile(&self) -> Result<TickOutcome, ReconcileError> {
        let state = self.load_state().await?;
        let head = self.client.fetch_head().await?;

        let Some(state) = state else {
            return self.bootstrap(head).await;
        };

        if head.hash == state.tip().hash {
            debug!(target: "blockstream::engine", block_number = head.number, "Head unchanged");
            return Ok(TickOutcome::no_op(head));
        }

        let target = self.catch_up_target(&state, head).await?;
        let (ancestor, plan) = self.plan(&state, target).await?;

        if !plan.to_remove.is_empty() {
            info!(
                target: "blockstream::engine",
                ancestor = %ancestor,
                depth = plan.reorg_depth(),
                old_tip = %state.tip(),
                new_tip = %target,
                "Reorg detected"
            );
        }

        let removed = self.announce_removals(&state, &plan).await?;

        // The watermark never stays above the fork point, nor below the floor.
        let floor = state.first_announceable();
        let mut last_announced =
            state.last_announced().map(|n| n.min(ancestor.number)).filter(|n| *n >= floor);
        let mut tracked: Vec<BlockRef> = state
            .tracked()
            .iter()
            .take_while(|block| block.number <= ancestor.number)
            .copied()
            .collect();
        tracked.extend_from_slice(&plan.to_add);

        let announced =
            self.announce_confirmed(&tracked, floor, &mut last_announced, head).await?;

        let mut new_state = ChainState::new(tracked, last_announced)
            .and_then(|state| state.with_first_announceable(floor))
            .map_err(|err| ReconcileError::PersistFailure(err.into()))?;
        new_state.trim(self.window_len());
        self.persist(&new_state).await?;

        debug!(
            target: "blockstream::engine",
            tip = %target,
            removed = removed.len(),
            announced = announced.len(),
            "Reconciled chain"
        );

        Ok(TickOutcome { kind: TickKind::Reconciled, head, new_tip: target, plan, removed, announced })
    }

    /// Seeds the tracked window from the head. Nothing is announced.
    async fn bootstrap(&self, head: BlockRef) -> Result<TickOutcome, ReconcileError> {
        let oldest = head.number.saturating_sub(self.config.window() - 1);

        let mut blocks = vec![head];
        let mut cursor = head;
        while cursor.number > oldest {
            let parent = self.fetch_parent(&cursor).await?;
            blocks.push(parent);
            cursor = parent;
        }
        blocks.reverse();

        let state = ChainState::bootstrapped(blocks.clone())
            .map_err(|err| ReconcileError::PersistFailure(err.into()))?;
        self.persist(&state).await?;

        info!(
            target: "blockstream::engine",
            head = %head,
            oldest = oldest,
            "Bootstrapped chain state"
        );

        Ok(TickOutcome {
            kind: TickKind::Bootstrap,
            head,
            new_tip: head,
            plan: ReconciliationPlan { to_remove: Vec::new(), to_add: blocks, common_ancestor: None },
            removed: Vec::new(),
            announced: Vec::new(),
        })
    }

    /// Caps how far a single tick moves the tip.
    async fn catch_up_target(
        &self,
        state: &ChainState,
        head: BlockRef,
    ) -> Result<BlockRef, ReconcileError> {
        let cap = state.tip().number.saturating_add(self.config.max_blocks_per_tick());
        if head.number <= cap {
            return Ok(head);
        }

        info!(
            target: "blockstream::engine",
            tip = state.tip().number,
            head = head.number,
            catch_up_to = cap,
            "Catching up"
        );
        self.client.fetch_block_by_number(cap).await?.ok_or(ReconcileError::InconsistentChain {
            number: cap,
            reason: "node is missing a block below its head",
        })
    }

    /// Walks back from `target` until it reaches a tracked block.
    async fn plan(
        &self,
        state: &ChainState,
        target: BlockRef,
    ) -> Result<(BlockRef, ReconciliationPlan), ReconcileError> {
        let oldest = state.oldest().number;
        let mut walked = Vec::new();
        let mut cursor = target;

        while !state.contains(&cursor) {
            if cursor.number <= oldest {
                return Err(ReconcileError::DeepReorg {
                    oldest_tracked: oldest,
                    walked_to: cursor.number,
                });
            }
            let parent = self.fetch_parent(&cursor).await?;
            walked.push(cursor);
            cursor = parent;
        }
        walked.reverse();

        let plan = ReconciliationPlan {
            to_remove: state.blocks_above(cursor.number).copied().collect(),
            to_add: walked,
            common_ancestor: Some(cursor),
        };
        Ok((cursor, plan))
    }

    async fn fetch_parent(&self, child: &BlockRef) -> Result<BlockRef, ReconcileError> {
        let number = child.number.checked_sub(1).ok_or(ReconcileError::InconsistentChain {
            number: child.number,
            reason: "walked past genesis",
        })?;

        let parent = self.client.fetch_block_by_number(number).await?.ok_or(
            ReconcileError::InconsistentChain { number, reason: "node is missing a block below its head" },
        )?;

        if !parent.is_parent_of(child) {
            warn!(
                target: "blockstream::engine",
                child = %child,
                parent = %parent,
                "Node returned an unlinked parent"
            );
            return Err(ReconcileError::InconsistentChain {
                number,
                reason: "block hash does not match the child's parent hash",
            });
        }
        Ok(parent)
    }

    /// Announces the removal of every announced block in the plan, highest first.
    async fn announce_removals(
        &self,
        state: &ChainState,
        plan: &ReconciliationPlan,
    ) -> Result<Vec<BlockRef>, ReconcileError> {
        let mut removed = Vec::new();
        for block in plan.to_remove.iter().filter(|block| state.is_announced(block.number)) {
            self.publish(self.publisher.publish_new_block(BlockEvent::Removed { block: *block }))
                .await?;
            debug!(target: "blockstream::engine", block = %block, "Announced removed block");
            removed.push(*block);
        }
        Ok(removed)
    }

    /// Announces every tracked block from `floor` and above the watermark that
    /// reached the confirmation delay, lowest first, advancing the watermark as
    /// it goes.
    async fn announce_confirmed(
        &self,
        tracked: &[BlockRef],
        floor: u64,
        last_announced: &mut Option<u64>,
        head: BlockRef,
    ) -> Result<Vec<BlockRef>, ReconcileError> {
        let mut announced = Vec::new();
        let eligible = tracked.iter().filter(|block| {
            block.number >= floor &&
                last_announced.is_none_or(|watermark| block.number > watermark) &&
                self.config.is_confirmed(block.number, head.number)
        });

        for block in eligible.copied().collect::<Vec<_>>() {
            let logs = self.client.fetch_logs(block.number).await?;
            if logs.iter().any(|log| log.block_hash != block.hash) {
                return Err(ReconcileError::InconsistentChain {
                    number: block.number,
                    reason: "logs belong to a different block",
                });
            }

            self.publish(self.publisher.publish_new_block(BlockEvent::Added { block })).await?;
            self.publish(
                self.publisher.publish_logs_available(LogsAvailable { block, log_count: logs.len() }),
            )
            .await?;
            self.publish(self.publisher.trigger_log_drain(block.number)).await?;

            debug!(
                target: "blockstream::engine",
                block = %block,
                log_count = logs.len(),
                "Announced block"
            );
            *last_announced = Some(block.number);
            announced.push(block);
        }
        Ok(announced)
    }

    async fn load_state(&self) -> Result<Option<ChainState>, ReconcileError> {
        match timeout(self.config.call_timeout(), self.store.get()).await {
            Ok(result) => result.map_err(ReconcileError::StateUnavailable),
            Err(_) => Err(ReconcileError::StateUnavailable(StorageError::Timeout(
                self.config.call_timeout(),
            ))),
        }
    }

    async fn persist(&self, state: &ChainState) -> Result<(), ReconcileError> {
        match timeout(self.config.call_timeout(), self.store.put(state)).await {
            Ok(result) => result.map_err(ReconcileError::PersistFailure),
            Err(_) => Err(ReconcileError::PersistFailure(StorageError::Timeout(
                self.config.call_timeout(),
            ))),
        }
    }

    async fn publish<F>(&self, publish: F) -> Result<(), ReconcileError>
    where
        F: Future<Output = Result<(), PublishError>>,
    {
        match timeout(self.config.call_timeout(), publish).await {
            Ok(result) => result.map_err(ReconcileError::PublishFailure),
            Err(_) => Err(ReconcileError::PublishFailure(PublishError::Timeout(
                self.config.call_timeout(),
            ))),
        }
    }

    fn window_len(&self) -> usize {
        usize::try_from(self.config.window()).unwrap_or(usize::MAX)
    }
}
