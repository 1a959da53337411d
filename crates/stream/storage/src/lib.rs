#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{ChainStateError, StorageError};

mod state;
pub use state::ChainState;

mod traits;
pub use traits::ChainStateStore;

mod memory;
pub use memory::InMemoryChainStateStore;

mod file;
pub use file::FileChainStateStore;
