//! # statejournal-primitives
//!
//! Primitive types and constants shared by the state journal crates.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod constants;

pub use alloy_primitives::map::{self, hash_map, hash_set, HashMap, HashSet};
pub use alloy_primitives::{
    self, address, b256, bytes, hex, keccak256, Address, Bytes, Log, LogData, B256, U256,
};
pub use constants::*;

/// Key of an account storage slot.
pub type StorageKey = B256;

/// Value stored inside an account storage slot.
pub type StorageValue = B256;
