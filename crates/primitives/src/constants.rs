//! Well-known addresses and hashes.
use alloy_primitives::{address, b256, Address, B256};

/// keccak256 of empty bytes, the code hash of an account without code.
pub const KECCAK_EMPTY: B256 =
    b256!("0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Address of the RIPEMD-160 precompile (`0x00..03`).
///
/// Touching this account is never undone. A consensus bug in the past left it
/// touched after an out-of-gas revert and the behaviour is kept for compatibility.
///
/// See <https://github.com/ethereum/go-ethereum/pull/3341>.
pub const RIPEMD_ADDRESS: Address = address!("0x0000000000000000000000000000000000000003");
