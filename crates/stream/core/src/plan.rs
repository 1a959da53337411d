use blockstream_schema::BlockRef;

/// The difference between the tracked chain and the node's chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Tracked blocks no longer on the canonical chain, highest first.
    pub to_remove: Vec<BlockRef>,
    /// Canonical blocks not yet tracked, lowest first.
    pub to_add: Vec<BlockRef>,
    /// The newest block both chains agree on. `None` when bootstrapping.
    pub common_ancestor: Option<BlockRef>,
}

impl ReconciliationPlan {
    /// Returns true if the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Returns the number of tracked blocks the reorg unwinds.
    pub fn reorg_depth(&self) -> usize {
        self.to_remove.len()
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// No prior state existed; the tracked window was seeded from the head.
    Bootstrap,
    /// The head was unchanged.
    NoOp,
    /// The tracked chain was moved towards the head.
    Reconciled,
}

/// The result of a successful tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// What the tick did.
    pub kind: TickKind,
    /// The node's head when the tick started.
    pub head: BlockRef,
    /// The tip of the persisted chain state.
    pub new_tip: BlockRef,
    /// The applied plan.
    pub plan: ReconciliationPlan,
    /// Blocks announced as removed, highest first.
    pub removed: Vec<BlockRef>,
    /// Blocks announced as added, lowest first.
    pub announced: Vec<BlockRef>,
}

impl TickOutcome {
    pub(crate) fn no_op(head: BlockRef) -> Self {
        Self {
            kind: TickKind::NoOp,
            head,
            new_tip: head,
            plan: ReconciliationPlan::default(),
            removed: Vec::new(),
            announced: Vec::new(),
        }
    }
}
