use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Errors that may occur while delivering an event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The receiving side of a channel is gone.
    #[error("{channel} channel is closed")]
    ChannelClosed {
        /// The channel name.
        channel: &'static str,
    },

    /// A queue file could not be appended to.
    #[error("failed to append to queue {}: {source}", path.display())]
    Io {
        /// The queue path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The message could not be encoded.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// Delivery did not complete in time.
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}
