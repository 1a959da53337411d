#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::ClientError;

mod transport;
pub use transport::NodeTransport;

mod provider;
pub use provider::ChainProvider;

mod client;
pub use client::{DEFAULT_REQUEST_TIMEOUT, NodeInfo, ValidatedClient};
