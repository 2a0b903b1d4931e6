use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::abi::schema_registry::SchemaRecord;

/// Events appended to the outbox in the same transaction as the state change
/// that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum Event {
    Registered {
        uid: B256,
        registerer: Address,
        schema: SchemaRecord,
    },
    Attested {
        recipient: Address,
        attester: Address,
        uid: B256,
        schema: B256,
    },
    Revoked {
        recipient: Address,
        revoker: Address,
        uid: B256,
        schema: B256,
    },
    Timestamped {
        data: B256,
        timestamp: u64,
    },
    RevokedOffchain {
        revoker: Address,
        data: B256,
        timestamp: u64,
    },
    NonceIncreased {
        account: Address,
        old_nonce: U256,
        new_nonce: U256,
    },
    Indexed {
        uid: B256,
    },
}

impl Event {
    /// Attestation UID carried by the event, if any.
    pub fn attestation_uid(&self) -> Option<B256> {
        match self {
            Event::Attested { uid, .. } | Event::Revoked { uid, .. } | Event::Indexed { uid } => {
                Some(*uid)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Registered { .. } => "Registered",
            Event::Attested { .. } => "Attested",
            Event::Revoked { .. } => "Revoked",
            Event::Timestamped { .. } => "Timestamped",
            Event::RevokedOffchain { .. } => "RevokedOffchain",
            Event::NonceIncreased { .. } => "NonceIncreased",
            Event::Indexed { .. } => "Indexed",
        }
    }
}
