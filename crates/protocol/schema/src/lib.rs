#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::SchemaError;

mod hex;

mod block;
pub use block::{BlockRef, decode_block_ref, decode_optional_block_ref};

mod log;
pub use log::{LogEntry, MAX_TOPICS, decode_logs};

mod node;
pub use node::{decode_client_version, decode_net_version};

mod abi;
pub use abi::{Abi, AbiInput, AbiMember, AbiOutput, decode_abi};

mod etherscan;
pub use etherscan::{
    EtherscanError, EtherscanResponse, EtherscanStatus, decode_etherscan_abi,
    decode_etherscan_response,
};
