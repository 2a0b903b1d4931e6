//! JSON bodies exchanged between the HTTP server and its clients.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::abi::eas::{Attestation, AttestationStatus};
use crate::eip712::Eip712Domain;

/// Body of every state-changing call: the caller, the value it attaches and the
/// operation's own request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest<T> {
    pub sender: Address,
    #[serde(default)]
    pub value: U256,
    pub request: T,
}

impl<T> WriteRequest<T> {
    pub fn new(sender: Address, request: T) -> Self {
        Self {
            sender,
            value: U256::ZERO,
            request,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSchemaRequest {
    pub schema: String,
    #[serde(default)]
    pub resolver: Address,
    pub revocable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UidResponse {
    pub uid: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UidsResponse {
    pub uids: Vec<B256>,
}

/// A page of a UID list together with the list's full length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UidPage {
    pub uids: Vec<B256>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub start: u64,
    #[serde(default = "PageQuery::default_length")]
    pub length: u64,
    #[serde(default)]
    pub reverse_order: bool,
}

impl PageQuery {
    fn default_length() -> u64 {
        100
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            start: 0,
            length: Self::default_length(),
            reverse_order: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationResponse {
    pub attestation: Attestation,
    pub status: AttestationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampResponse {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttesterResponse {
    pub attester: Address,
}

/// Signing domains of the engine and the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainResponse {
    pub eas: Eip712Domain,
    pub proxy: Eip712Domain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
