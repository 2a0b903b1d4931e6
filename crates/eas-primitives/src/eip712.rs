//! EIP-712 typed-data hashing and signer recovery for delegated requests.
//!
//! The type strings below are part of the wire contract with external signing
//! tools and must not change.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{keccak256, uint, Address, PrimitiveSignature, B256, U256},
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::{
    abi::eas::{AttestationRequestData, RevocationRequestData, Signature},
    utils::hash_typed_data,
    EasError, Result,
};

pub const EIP712_DOMAIN_TYPE_STRING: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Attest/Revoke types signed for nonce-protected verifiers.
pub const ATTEST_TYPE_STRING: &str =
    "Attest(address attester,bytes32 schema,address recipient,uint64 expirationTime,bool revocable,bytes32 refUID,bytes data,uint256 value,uint256 nonce,uint64 deadline)";
pub const REVOKE_TYPE_STRING: &str =
    "Revoke(address revoker,bytes32 schema,bytes32 uid,uint256 value,uint256 nonce,uint64 deadline)";

/// Attest/Revoke types signed for proxies, which track used signatures instead of nonces.
pub const ATTEST_PROXY_TYPE_STRING: &str =
    "Attest(address attester,bytes32 schema,address recipient,uint64 expirationTime,bool revocable,bytes32 refUID,bytes data,uint256 value,uint64 deadline)";
pub const REVOKE_PROXY_TYPE_STRING: &str =
    "Revoke(address revoker,bytes32 schema,bytes32 uid,uint256 value,uint64 deadline)";

/// secp256k1n / 2, the largest `s` accepted in canonical signatures.
pub const SECP256K1N_HALF: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

lazy_static! {
    pub static ref EIP712_DOMAIN_TYPE_HASH: B256 = keccak256(EIP712_DOMAIN_TYPE_STRING.as_bytes());
    pub static ref ATTEST_TYPE_HASH: B256 = keccak256(ATTEST_TYPE_STRING.as_bytes());
    pub static ref REVOKE_TYPE_HASH: B256 = keccak256(REVOKE_TYPE_STRING.as_bytes());
    pub static ref ATTEST_PROXY_TYPE_HASH: B256 = keccak256(ATTEST_PROXY_TYPE_STRING.as_bytes());
    pub static ref REVOKE_PROXY_TYPE_HASH: B256 = keccak256(REVOKE_PROXY_TYPE_STRING.as_bytes());
}

/// Domain binding of a verifier: name, version, chain and contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    #[must_use]
    pub fn separator(&self) -> B256 {
        let values = DynSolValue::Tuple(vec![
            DynSolValue::FixedBytes(*EIP712_DOMAIN_TYPE_HASH, 32),
            DynSolValue::FixedBytes(keccak256(self.name.as_bytes()), 32),
            DynSolValue::FixedBytes(keccak256(self.version.as_bytes()), 32),
            DynSolValue::Uint(U256::from(self.chain_id), 256),
            DynSolValue::Address(self.verifying_contract),
        ]);
        keccak256(values.abi_encode())
    }
}

/// Struct hash of an Attest message.
///
/// `nonce` is `Some` for the nonce-protected type and `None` for the proxy type;
/// `type_hash` must be the matching type hash.
pub fn attest_struct_hash(
    type_hash: B256,
    attester: Address,
    schema: B256,
    data: &AttestationRequestData,
    nonce: Option<U256>,
    deadline: u64,
) -> B256 {
    let mut values = vec![
        DynSolValue::FixedBytes(type_hash, 32),
        DynSolValue::Address(attester),
        DynSolValue::FixedBytes(schema, 32),
        DynSolValue::Address(data.recipient),
        DynSolValue::Uint(U256::from(data.expirationTime), 64),
        DynSolValue::Bool(data.revocable),
        DynSolValue::FixedBytes(data.refUID, 32),
        DynSolValue::FixedBytes(keccak256(&data.data), 32),
        DynSolValue::Uint(data.value, 256),
    ];
    if let Some(nonce) = nonce {
        values.push(DynSolValue::Uint(nonce, 256));
    }
    values.push(DynSolValue::Uint(U256::from(deadline), 64));

    keccak256(DynSolValue::Tuple(values).abi_encode())
}

/// Struct hash of a Revoke message, see [`attest_struct_hash`].
pub fn revoke_struct_hash(
    type_hash: B256,
    revoker: Address,
    schema: B256,
    data: &RevocationRequestData,
    nonce: Option<U256>,
    deadline: u64,
) -> B256 {
    let mut values = vec![
        DynSolValue::FixedBytes(type_hash, 32),
        DynSolValue::Address(revoker),
        DynSolValue::FixedBytes(schema, 32),
        DynSolValue::FixedBytes(data.uid, 32),
        DynSolValue::Uint(data.value, 256),
    ];
    if let Some(nonce) = nonce {
        values.push(DynSolValue::Uint(nonce, 256));
    }
    values.push(DynSolValue::Uint(U256::from(deadline), 64));

    keccak256(DynSolValue::Tuple(values).abi_encode())
}

/// Signable digest of an Attest message under `domain`.
pub fn attest_digest(
    domain: &Eip712Domain,
    attester: Address,
    schema: B256,
    data: &AttestationRequestData,
    nonce: Option<U256>,
    deadline: u64,
) -> B256 {
    let type_hash = match nonce {
        Some(_) => *ATTEST_TYPE_HASH,
        None => *ATTEST_PROXY_TYPE_HASH,
    };
    let struct_hash = attest_struct_hash(type_hash, attester, schema, data, nonce, deadline);
    hash_typed_data(domain.separator(), struct_hash)
}

/// Signable digest of a Revoke message under `domain`.
pub fn revoke_digest(
    domain: &Eip712Domain,
    revoker: Address,
    schema: B256,
    data: &RevocationRequestData,
    nonce: Option<U256>,
    deadline: u64,
) -> B256 {
    let type_hash = match nonce {
        Some(_) => *REVOKE_TYPE_HASH,
        None => *REVOKE_PROXY_TYPE_HASH,
    };
    let struct_hash = revoke_struct_hash(type_hash, revoker, schema, data, nonce, deadline);
    hash_typed_data(domain.separator(), struct_hash)
}

/// Recover the signer of `digest`, rejecting malleable or malformed signatures.
pub fn recover_signer(digest: &B256, signature: &Signature) -> Result<Address> {
    let y_parity = match signature.v {
        0 | 27 => false,
        1 | 28 => true,
        _ => return Err(EasError::InvalidSignature),
    };
    let r = U256::from_be_bytes(signature.r.0);
    let s = U256::from_be_bytes(signature.s.0);
    if r.is_zero() || s.is_zero() || s > SECP256K1N_HALF {
        return Err(EasError::InvalidSignature);
    }

    PrimitiveSignature::new(r, s, y_parity)
        .recover_address_from_prehash(digest)
        .map_err(|_| EasError::InvalidSignature)
}

/// Check that `signature` over `digest` was produced by `expected`.
pub fn verify_signature(digest: &B256, signature: &Signature, expected: Address) -> Result<()> {
    let signer = recover_signer(digest, signature)?;
    if signer != expected {
        return Err(EasError::InvalidSignature);
    }
    Ok(())
}
