//! Core types for the Ethereum Attestation Service
//!
//! This crate re-exports the alloy types used across the workspace to ensure
//! version compatibility and provide a single source of truth.

pub mod alloy {
    pub mod primitives {
        pub use alloy::primitives::{
            address, b256, bytes, fixed_bytes, keccak256, Address, Bytes, FixedBytes,
            PrimitiveSignature, B256, U256,
        };
    }

    pub mod sol_types {
        pub use alloy::sol_types::SolValue;
    }

    pub mod signers {
        pub use alloy::signers::{local::PrivateKeySigner, Signer, SignerSync};
    }
}

pub mod abi;
pub mod api;
pub mod eip712;
pub mod error;
pub mod events;
pub mod pagination;
pub mod uid;
pub mod utils;

pub use abi::eas::*;
pub use abi::schema_registry::SchemaRecord;
pub use error::{EasError, Result};
pub use events::Event;
