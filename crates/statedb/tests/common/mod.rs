#![allow(dead_code, unreachable_pub)]

use primitives::{address, b256, Address, B256};
use std::sync::Once;

pub const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
pub const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");
pub const CAROL: Address = address!("0x00000000000000000000000000000000000ca201");

pub const TX1: B256 = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
pub const TX2: B256 = b256!("0x2222222222222222222222222222222222222222222222222222222222222222");

/// Installs a subscriber printing journal traces, once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}
