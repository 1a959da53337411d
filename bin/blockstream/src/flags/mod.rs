//! CLI flag groups.

mod node;
pub use node::NodeArgs;

mod storage;
pub use storage::StorageArgs;

mod queues;
pub use queues::QueueArgs;

mod engine;
pub use engine::EngineArgs;
