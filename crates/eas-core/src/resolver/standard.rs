//! Reference resolvers covering the common schema policies.

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::{Address, B256, U256};
use eas_primitives::{Attestation, Result};

use super::SchemaResolver;
use crate::store::{tables, Store};

/// Accepts attestations made by one attester only.
#[derive(Debug, Clone)]
pub struct AttesterResolver {
    eas: Address,
    target_attester: Address,
}

impl AttesterResolver {
    pub fn new(eas: Address, target_attester: Address) -> Self {
        Self {
            eas,
            target_attester,
        }
    }
}

impl SchemaResolver for AttesterResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(attestation.attester == self.target_attester)
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Accepts attestations about one recipient only.
#[derive(Debug, Clone)]
pub struct RecipientResolver {
    eas: Address,
    target_recipient: Address,
}

impl RecipientResolver {
    pub fn new(eas: Address, target_recipient: Address) -> Self {
        Self {
            eas,
            target_recipient,
        }
    }
}

impl SchemaResolver for RecipientResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(attestation.recipient == self.target_recipient)
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Accepts a single-byte payload of 0 or 1.
#[derive(Debug, Clone)]
pub struct DataResolver {
    eas: Address,
}

impl DataResolver {
    pub fn new(eas: Address) -> Self {
        Self { eas }
    }
}

impl SchemaResolver for DataResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(matches!(attestation.data.as_ref(), [0] | [1]))
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Accepts attestations expiring no earlier than `valid_after`.
#[derive(Debug, Clone)]
pub struct ExpirationTimeResolver {
    eas: Address,
    valid_after: u64,
}

impl ExpirationTimeResolver {
    pub fn new(eas: Address, valid_after: u64) -> Self {
        Self { eas, valid_after }
    }
}

impl SchemaResolver for ExpirationTimeResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(attestation.expirationTime >= self.valid_after)
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Accepts every attestation; revocations follow a switch.
#[derive(Debug)]
pub struct RevocationResolver {
    eas: Address,
    revocation: AtomicBool,
}

impl RevocationResolver {
    pub fn new(eas: Address, revocation: bool) -> Self {
        Self {
            eas,
            revocation: AtomicBool::new(revocation),
        }
    }

    pub fn set_revocation(&self, revocation: bool) {
        self.revocation.store(revocation, Ordering::SeqCst);
    }
}

impl SchemaResolver for RevocationResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(self.revocation.load(Ordering::SeqCst))
    }
}

/// Accepts attestations whose payload is the UID of an existing attestation.
#[derive(Debug, Clone)]
pub struct AttestationResolver {
    eas: Address,
}

impl AttestationResolver {
    pub fn new(eas: Address) -> Self {
        Self { eas }
    }
}

impl SchemaResolver for AttestationResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn on_attest(
        &self,
        store: &mut dyn Store,
        attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        if attestation.data.len() != 32 {
            return Ok(false);
        }
        let uid = B256::from_slice(&attestation.data);
        Ok(tables::has_attestation(store, &uid))
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Payable resolver accepting attestations that carry exactly `target_value`.
#[derive(Debug, Clone)]
pub struct ValueResolver {
    eas: Address,
    target_value: U256,
}

impl ValueResolver {
    pub fn new(eas: Address, target_value: U256) -> Self {
        Self { eas, target_value }
    }
}

impl SchemaResolver for ValueResolver {
    fn eas(&self) -> Address {
        self.eas
    }

    fn is_payable(&self) -> bool {
        true
    }

    fn on_attest(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        value: U256,
    ) -> Result<bool> {
        Ok(value == self.target_value)
    }

    fn on_revoke(
        &self,
        _store: &mut dyn Store,
        _attestation: &Attestation,
        _value: U256,
    ) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use alloy::primitives::{address, Bytes};
    use rstest::rstest;

    const EAS: Address = address!("00000000000000000000000000000000000000ea");

    fn with_data(data: &'static [u8]) -> Attestation {
        Attestation {
            data: Bytes::from_static(data),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(b"\x00", true)]
    #[case(b"\x01", true)]
    #[case(b"\x02", false)]
    #[case(b"", false)]
    #[case(b"\x01\x00", false)]
    fn data_resolver_accepts_single_bit(#[case] data: &'static [u8], #[case] accepted: bool) {
        let mut store = MemoryStore::new();
        let resolver = DataResolver::new(EAS);
        assert_eq!(
            resolver
                .on_attest(&mut store, &with_data(data), U256::ZERO)
                .unwrap(),
            accepted
        );
    }

    #[test]
    fn revocation_switch_is_live() {
        let mut store = MemoryStore::new();
        let resolver = RevocationResolver::new(EAS, true);
        let attestation = Attestation::default();

        assert!(resolver.on_revoke(&mut store, &attestation, U256::ZERO).unwrap());
        resolver.set_revocation(false);
        assert!(!resolver.on_revoke(&mut store, &attestation, U256::ZERO).unwrap());
    }

    #[test]
    fn attestation_resolver_requires_existing_target() {
        let mut store = MemoryStore::new();
        let resolver = AttestationResolver::new(EAS);
        let target = Attestation {
            uid: B256::repeat_byte(3),
            ..Default::default()
        };
        let referencing = Attestation {
            data: Bytes::copy_from_slice(target.uid.as_slice()),
            ..Default::default()
        };

        assert!(!resolver.on_attest(&mut store, &referencing, U256::ZERO).unwrap());
        tables::put_attestation(&mut store, &target);
        assert!(resolver.on_attest(&mut store, &referencing, U256::ZERO).unwrap());
        assert!(!resolver
            .on_attest(&mut store, &with_data(b"\x01"), U256::ZERO)
            .unwrap());
    }
}
