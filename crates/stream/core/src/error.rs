use blockstream_client::ClientError;
use blockstream_publisher::PublishError;
use blockstream_storage::StorageError;
use thiserror::Error;

/// Errors that abort a reconciliation tick.
///
/// No error leaves a partially applied state behind: the chain state store is
/// only written as the last step of a successful tick.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The node returned data that failed validation.
    #[error("node returned invalid data: {0}")]
    Schema(#[source] ClientError),

    /// The node refused a request with a JSON-RPC error.
    #[error("node rejected a request: {0}")]
    NodeRejected(#[source] ClientError),

    /// The node could not be reached or did not answer in time.
    #[error("node unavailable: {0}")]
    NodeUnavailable(#[source] ClientError),

    /// The node served blocks that do not link up, usually because it is
    /// itself in the middle of a reorg.
    #[error("inconsistent chain at block {number}: {reason}")]
    InconsistentChain {
        /// The block number where the chain broke.
        number: u64,
        /// What was wrong.
        reason: &'static str,
    },

    /// The chain state could not be loaded.
    #[error("chain state unavailable: {0}")]
    StateUnavailable(#[source] StorageError),

    /// The remote chain diverges below the oldest tracked block.
    #[error("reorg deeper than the tracked window: oldest tracked block is {oldest_tracked}, walked to {walked_to}")]
    DeepReorg {
        /// The oldest tracked block number.
        oldest_tracked: u64,
        /// The lowest remote block reached without finding an ancestor.
        walked_to: u64,
    },

    /// An event could not be delivered.
    #[error("failed to publish: {0}")]
    PublishFailure(#[source] PublishError),

    /// The new chain state could not be written.
    #[error("failed to persist chain state: {0}")]
    PersistFailure(#[source] StorageError),
}

impl ReconcileError {
    /// Returns true if retrying on a later tick cannot help.
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Schema(_) |
            Self::NodeRejected(_) |
            Self::DeepReorg { .. } |
            Self::PersistFailure(_) => true,
            Self::StateUnavailable(err) => !err.is_transient(),
            Self::NodeUnavailable(_) | Self::InconsistentChain { .. } | Self::PublishFailure(_) => {
                false
            }
        }
    }

    /// Returns a short label for logs and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::NodeRejected(_) => "node_rejected",
            Self::NodeUnavailable(_) => "node_unavailable",
            Self::InconsistentChain { .. } => "inconsistent_chain",
            Self::StateUnavailable(_) => "state_unavailable",
            Self::DeepReorg { .. } => "deep_reorg",
            Self::PublishFailure(_) => "publish_failure",
            Self::PersistFailure(_) => "persist_failure",
        }
    }
}

impl From<ClientError> for ReconcileError {
    fn from(err: ClientError) -> Self {
        if err.is_unavailable() {
            Self::NodeUnavailable(err)
        } else if matches!(err, ClientError::Rejected { .. }) {
            Self::NodeRejected(err)
        } else {
            Self::Schema(err)
        }
    }
}
