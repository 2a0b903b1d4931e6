//! Schema resolvers: per-schema policy hooks invoked by the engine, and the
//! directory mapping resolver addresses to implementations.

pub mod standard;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use alloy::primitives::{Address, U256};
use eas_primitives::{Attestation, EasError, Result};
use tracing::debug;

use crate::store::{atomically, tables, Store};

pub use standard::{
    AttestationResolver, AttesterResolver, DataResolver, ExpirationTimeResolver,
    RecipientResolver, RevocationResolver, ValueResolver,
};

/// Policy hook attached to a schema.
///
/// Implementors provide [`on_attest`](Self::on_attest) and
/// [`on_revoke`](Self::on_revoke); the provided entry points restrict callers to
/// the bound engine and split forwarded value across batch items.
pub trait SchemaResolver: fmt::Debug + Send + Sync {
    /// Engine allowed to invoke this resolver.
    fn eas(&self) -> Address;

    /// Whether the resolver accepts value.
    fn is_payable(&self) -> bool {
        false
    }

    fn on_attest(&self, store: &mut dyn Store, attestation: &Attestation, value: U256)
        -> Result<bool>;

    fn on_revoke(&self, store: &mut dyn Store, attestation: &Attestation, value: U256)
        -> Result<bool>;

    fn attest(
        &self,
        store: &mut dyn Store,
        caller: Address,
        attestation: &Attestation,
        value: U256,
    ) -> Result<bool> {
        self.only_eas(caller)?;
        self.on_attest(store, attestation, value)
    }

    /// Batch form of [`attest`](Self::attest). `forwarded` is the total value
    /// sent along and must cover every item's value.
    fn multi_attest(
        &self,
        store: &mut dyn Store,
        caller: Address,
        attestations: &[Attestation],
        values: &[U256],
        forwarded: U256,
    ) -> Result<bool> {
        self.only_eas(caller)?;
        if attestations.len() != values.len() {
            return Err(EasError::InvalidLength);
        }

        let mut remaining = forwarded;
        for (attestation, value) in attestations.iter().zip(values) {
            if *value > remaining {
                return Err(EasError::InsufficientValue);
            }
            if !self.on_attest(store, attestation, *value)? {
                return Ok(false);
            }
            remaining -= *value;
        }
        Ok(true)
    }

    fn revoke(
        &self,
        store: &mut dyn Store,
        caller: Address,
        attestation: &Attestation,
        value: U256,
    ) -> Result<bool> {
        self.only_eas(caller)?;
        self.on_revoke(store, attestation, value)
    }

    fn multi_revoke(
        &self,
        store: &mut dyn Store,
        caller: Address,
        attestations: &[Attestation],
        values: &[U256],
        forwarded: U256,
    ) -> Result<bool> {
        self.only_eas(caller)?;
        if attestations.len() != values.len() {
            return Err(EasError::InvalidLength);
        }

        let mut remaining = forwarded;
        for (attestation, value) in attestations.iter().zip(values) {
            if *value > remaining {
                return Err(EasError::InsufficientValue);
            }
            if !self.on_revoke(store, attestation, *value)? {
                return Ok(false);
            }
            remaining -= *value;
        }
        Ok(true)
    }

    /// Plain value transfer outside of any attestation.
    fn receive(&self, _value: U256) -> Result<()> {
        if !self.is_payable() {
            return Err(EasError::NotPayable);
        }
        Ok(())
    }

    fn only_eas(&self, caller: Address) -> Result<()> {
        if caller != self.eas() {
            return Err(EasError::AccessDenied);
        }
        Ok(())
    }
}

/// Resolver implementations by address.
#[derive(Debug, Default)]
pub struct ResolverDirectory {
    resolvers: RwLock<HashMap<Address, Arc<dyn SchemaResolver>>>,
}

impl ResolverDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `resolver` reachable at `address`, replacing any previous one.
    pub fn deploy(&self, address: Address, resolver: impl SchemaResolver + 'static) {
        self.insert(address, Arc::new(resolver));
    }

    pub fn insert(&self, address: Address, resolver: Arc<dyn SchemaResolver>) {
        debug!(%address, ?resolver, "resolver deployed");
        self.resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, resolver);
    }

    pub fn get(&self, address: Address) -> Result<Arc<dyn SchemaResolver>> {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .cloned()
            .ok_or(EasError::UnknownResolver(address))
    }

    /// Send `value` straight to the resolver at `to`.
    pub fn send_value(&self, store: &mut dyn Store, to: Address, value: U256) -> Result<()> {
        let resolver = self.get(to)?;
        atomically(store, |store| {
            resolver.receive(value)?;
            tables::credit(store, to, value)
        })
    }
}
