use alloy::primitives::{address, Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use eas_core::{CallContext, Ledger};
use eas_primitives::AttestationRequestData;
use rstest::*;

use super::helpers::register;

/// Block time used by every call unless a test moves the clock.
pub const NOW: u64 = 1_700_000_000;

pub const ALICE: Address = address!("000000000000000000000000000000000000a11c");
pub const BOB: Address = address!("0000000000000000000000000000000000000b0b");
pub const CAROL: Address = address!("00000000000000000000000000000000000ca201");

pub const RESOLVER: Address = address!("00000000000000000000000000000000000e5017");

pub const DUMMY_PRIV_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn ctx(sender: Address) -> CallContext {
    CallContext::new(sender, NOW)
}

/// Revocable request about `recipient` with a one-byte payload.
pub fn request_data(recipient: Address) -> AttestationRequestData {
    AttestationRequestData {
        recipient,
        expirationTime: 0,
        revocable: true,
        refUID: B256::ZERO,
        data: Bytes::from_static(b"\x01"),
        value: Default::default(),
    }
}

#[fixture]
pub fn ledger() -> Ledger {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("eas_core=debug")
        .with_test_writer()
        .try_init();
    Ledger::default()
}

#[fixture]
pub fn signer() -> PrivateKeySigner {
    DUMMY_PRIV_KEY.parse().unwrap()
}

/// Ledger with a revocable schema without resolver already registered.
#[fixture]
pub fn with_schema(mut ledger: Ledger) -> (Ledger, B256) {
    let schema = register(&mut ledger, "bool like", Address::ZERO, true);
    (ledger, schema)
}
