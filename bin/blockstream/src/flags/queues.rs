use blockstream_publisher::QueueNames;
use clap::Parser;

/// Queue name arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct QueueArgs {
    /// Queue receiving added and removed block events.
    #[arg(long = "new-block-queue", env = "NEW_BLOCK_QUEUE_NAME", default_value = "new-block-queue")]
    pub new_block_queue: String,
    /// Queue receiving log availability notifications.
    #[arg(
        long = "log-firehose-queue",
        env = "LOG_FIREHOSE_QUEUE_NAME",
        default_value = "log-firehose-queue"
    )]
    pub log_firehose_queue: String,
    /// Trigger queue of the task that drains block logs.
    #[arg(
        long = "log-drain-task",
        env = "DRAIN_BLOCK_QUEUE_LAMBDA_NAME",
        default_value = "drain-block-queue"
    )]
    pub log_drain_task: String,
}

impl QueueArgs {
    /// Returns the configured queue names.
    pub fn names(&self) -> QueueNames {
        QueueNames {
            new_block: self.new_block_queue.clone(),
            log_firehose: self.log_firehose_queue.clone(),
            log_drain: self.log_drain_task.clone(),
        }
    }
}
