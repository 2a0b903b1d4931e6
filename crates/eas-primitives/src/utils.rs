use alloy::primitives::{keccak256, B256};
use alloy::sol_types::SolValue;

/// Expiration time (and deadline) value meaning "never expires".
pub const NO_EXPIRATION_TIME: u64 = 0;
/// UID of the empty schema record / attestation, also the "no reference" refUID.
pub const EMPTY_UID: B256 = B256::ZERO;

/// Semantic versions of the deployed components.
pub const SCHEMA_REGISTRY_VERSION: &str = "1.3.0";
pub const EAS_VERSION: &str = "1.3.0";
pub const EIP712_PROXY_VERSION: &str = "1.3.0";
pub const INDEXER_VERSION: &str = "1.3.0";

/// EIP-712 domain name used by the attestation engine.
pub const EAS_NAME: &str = "EAS";

/// Final EIP-712 digest: keccak256("\x19\x01" || domainSeparator || structHash)
#[must_use]
pub fn hash_typed_data(domain_separator: B256, data_hash: B256) -> B256 {
    let final_hash_preimage = [
        "\x19\x01".abi_encode_packed(),
        domain_separator.abi_encode(),
        data_hash.abi_encode(),
    ]
    .concat();

    keccak256(final_hash_preimage)
}
