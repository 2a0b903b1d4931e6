use alloy::primitives::Address;
use thiserror::Error;

/// Every way an attestation service call can abort.
///
/// All variants are local precondition failures: the enclosing transaction is
/// reverted and nothing is retried at this layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EasError {
    #[error("schema already registered")]
    AlreadyExists,
    #[error("not found")]
    NotFound,
    #[error("invalid schema")]
    InvalidSchema,
    #[error("invalid expiration time")]
    InvalidExpirationTime,
    #[error("attestation is irrevocable")]
    Irrevocable,
    #[error("attestation already revoked")]
    AlreadyRevoked,
    #[error("access denied")]
    AccessDenied,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("signature already used")]
    UsedSignature,
    #[error("signature deadline expired")]
    DeadlineExpired,
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid offset")]
    InvalidOffset,
    #[error("resolver is not payable")]
    NotPayable,
    #[error("insufficient value")]
    InsufficientValue,
    #[error("attestation rejected by resolver")]
    InvalidAttestation,
    #[error("attestations rejected by resolver")]
    InvalidAttestations,
    #[error("revocation rejected by resolver")]
    InvalidRevocation,
    #[error("revocations rejected by resolver")]
    InvalidRevocations,
    #[error("invalid nonce")]
    InvalidNonce,
    #[error("data already timestamped")]
    AlreadyTimestamped,
    #[error("data already revoked offchain")]
    AlreadyRevokedOffchain,
    #[error("no resolver deployed at {0}")]
    UnknownResolver(Address),
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = core::result::Result<T, EasError>;
