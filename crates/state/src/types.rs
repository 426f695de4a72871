use crate::StateObject;
use primitives::{Address, Bytes, HashMap, Log, StorageKey, StorageValue, B256};
use std::vec::Vec;

/// Live account objects keyed by address.
pub type StateObjects = HashMap<Address, StateObject>;

/// Storage of a single account.
pub type ObjectStorage = HashMap<StorageKey, StorageValue>;

/// Logs emitted during execution, grouped by transaction hash in emission order.
pub type StateLogs = HashMap<B256, Vec<Log>>;

/// Preimages of hashes seen during execution.
pub type Preimages = HashMap<B256, Bytes>;
