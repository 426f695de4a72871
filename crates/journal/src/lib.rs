//! Reversible change journal for an account state store.
//!
//! Every mutation of the store is preceded by a [`JournalEntry`] that remembers the value it
//! overwrites. A [`Journal`] keeps those entries in order and can roll the store back to any
//! [`JournalCheckpoint`] taken earlier by undoing the entries appended after it, newest first.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod entry;
pub mod error;
pub mod journal;
pub mod store;

pub use entry::JournalEntry;
pub use error::JournalError;
pub use journal::{Journal, JournalCheckpoint};
pub use store::JournaledStore;

#[cfg(test)]
mod test_utils;
