//! # statejournal-statedb
//!
//! In-memory account state database. Every mutation goes through the [`journal`] first, so the
//! database can be rolled back to any [`RevisionId`] returned by [`StateDb::snapshot`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod cfg;
pub mod db;
pub mod error;
pub mod store;

pub use cfg::StateDbCfg;
pub use db::{FinaliseOutput, RevisionId, StateDb};
pub use error::StateDbError;
pub use journal;
pub use state;
pub use store::ObjectStore;
