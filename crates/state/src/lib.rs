//! Account state objects.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

mod object;
mod types;

pub use object::{ObjectStatus, StateObject};
pub use primitives;
pub use types::{ObjectStorage, Preimages, StateLogs, StateObjects};
