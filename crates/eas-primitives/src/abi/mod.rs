//! ABI-compatible structures shared by every attestation service component.
//!
//! The structs are declared with `sol!` so that they encode, hash and
//! serialize exactly like their Solidity counterparts.

pub mod eas;
pub mod schema_registry;
