use alloy::primitives::{address, Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use eas_primitives::AttestationRequestData;
use rstest::*;

pub const ALICE: Address = address!("000000000000000000000000000000000000a11c");
pub const BOB: Address = address!("0000000000000000000000000000000000000b0b");
pub const CAROL: Address = address!("00000000000000000000000000000000000ca201");

pub const DUMMY_PRIV_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

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
pub fn signer() -> PrivateKeySigner {
    DUMMY_PRIV_KEY.parse().unwrap()
}
