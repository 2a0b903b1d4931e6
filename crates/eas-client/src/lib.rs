//! HTTP client for the attestation service, plus helpers that sign delegated
//! requests locally.

pub mod api;
pub mod error;
pub mod signer;
pub mod stream;

pub use api::EasApiClient;
pub use error::{ClientError, Result};
pub use signer::DelegationSigner;
