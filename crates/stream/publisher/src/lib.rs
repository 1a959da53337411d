#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::PublishError;

mod event;
pub use event::{BlockEvent, LogDrainTrigger, LogsAvailable};

mod traits;
pub use traits::EventPublisher;

mod channel;
pub use channel::{ChannelPublisher, PublisherReceivers};

mod file;
pub use file::{FileQueuePublisher, QueueNames};
