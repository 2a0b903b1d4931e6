use alloy::primitives::{PrimitiveSignature, B256, U256};
use alloy::sol;
use serde::{Deserialize, Serialize};

use crate::utils::{EMPTY_UID, NO_EXPIRATION_TIME};

sol! {
    /// ECDSA signature in (v, r, s) form.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct Signature {
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    /// A stored attestation. The zero-valued record stands for "no such attestation".
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct Attestation {
        bytes32 uid;
        bytes32 schema;
        uint64 time;
        uint64 expirationTime;
        uint64 revocationTime;
        bytes32 refUID;
        address recipient;
        address attester;
        bool revocable;
        bytes data;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct AttestationRequestData {
        address recipient;
        uint64 expirationTime;
        bool revocable;
        bytes32 refUID;
        bytes data;
        uint256 value;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct AttestationRequest {
        bytes32 schema;
        AttestationRequestData data;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct MultiAttestationRequest {
        bytes32 schema;
        AttestationRequestData[] data;
    }

    /// Attestation request authorised by an off-chain signature of `attester`.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct DelegatedAttestationRequest {
        bytes32 schema;
        AttestationRequestData data;
        Signature signature;
        address attester;
        uint64 deadline;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct MultiDelegatedAttestationRequest {
        bytes32 schema;
        AttestationRequestData[] data;
        Signature[] signatures;
        address attester;
        uint64 deadline;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct RevocationRequestData {
        bytes32 uid;
        uint256 value;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct RevocationRequest {
        bytes32 schema;
        RevocationRequestData data;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct MultiRevocationRequest {
        bytes32 schema;
        RevocationRequestData[] data;
    }

    /// Revocation request authorised by an off-chain signature of `revoker`.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct DelegatedRevocationRequest {
        bytes32 schema;
        RevocationRequestData data;
        Signature signature;
        address revoker;
        uint64 deadline;
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct MultiDelegatedRevocationRequest {
        bytes32 schema;
        RevocationRequestData[] data;
        Signature[] signatures;
        address revoker;
        uint64 deadline;
    }
}

impl Signature {
    /// Build the ABI form of a recoverable signature, with `v` in {27, 28}.
    pub fn from_parts(r: U256, s: U256, y_parity: bool) -> Self {
        Self {
            v: 27 + y_parity as u8,
            r: B256::from(r.to_be_bytes::<32>()),
            s: B256::from(s.to_be_bytes::<32>()),
        }
    }
}

impl From<PrimitiveSignature> for Signature {
    fn from(signature: PrimitiveSignature) -> Self {
        Self::from_parts(signature.r(), signature.s(), signature.v())
    }
}

/// Lifecycle status of an attestation as observed at a given time.
///
/// `Expired` is never stored, it is derived from `expirationTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    Unset,
    Active,
    Revoked,
    Expired,
}

impl Attestation {
    /// True for the empty record returned on lookup misses.
    pub fn is_empty(&self) -> bool {
        self.uid == EMPTY_UID
    }

    pub fn is_revoked(&self) -> bool {
        self.revocationTime != 0
    }

    /// Whether the attestation has passed its expiration time at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expirationTime != NO_EXPIRATION_TIME && self.expirationTime <= now
    }

    pub fn status(&self, now: u64) -> AttestationStatus {
        if self.is_empty() {
            AttestationStatus::Unset
        } else if self.is_revoked() {
            AttestationStatus::Revoked
        } else if self.is_expired(now) {
            AttestationStatus::Expired
        } else {
            AttestationStatus::Active
        }
    }
}
