use alloy::primitives::{Address, B256};
use eas_primitives::uid::schema_uid;
use eas_primitives::utils::SCHEMA_REGISTRY_VERSION;
use eas_primitives::{EasError, Event, Result, SchemaRecord};
use tracing::info;

use crate::context::CallContext;
use crate::store::{atomically, tables, Store};

/// Append-only registry of schemas, keyed by content-derived UID.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    address: Address,
}

impl SchemaRegistry {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn version(&self) -> &'static str {
        SCHEMA_REGISTRY_VERSION
    }

    /// Register `schema` with an optional resolver and return its UID.
    ///
    /// The schema string is stored verbatim and never validated.
    pub fn register(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        schema: &str,
        resolver: Address,
        revocable: bool,
    ) -> Result<B256> {
        atomically(store, |store| {
            let uid = schema_uid(schema, resolver, revocable);
            if tables::schema(store, &uid)?.is_some() {
                return Err(EasError::AlreadyExists);
            }

            let record = SchemaRecord {
                uid,
                resolver,
                revocable,
                schema: schema.to_string(),
            };
            tables::put_schema(store, &record);
            store.emit(Event::Registered {
                uid,
                registerer: ctx.sender,
                schema: record,
            });
            info!(%uid, registerer = %ctx.sender, "schema registered");
            Ok(uid)
        })
    }

    /// Look up a schema. Unknown UIDs yield the empty record.
    pub fn get_schema(&self, store: &dyn Store, uid: &B256) -> Result<SchemaRecord> {
        Ok(tables::schema(store, uid)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use alloy::primitives::address;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(address!("0000000000000000000000000000000000005c4e"))
    }

    #[test]
    fn register_then_get() {
        let mut store = MemoryStore::new();
        let ctx = CallContext::new(address!("000000000000000000000000000000000000a11c"), 1);
        let uid = registry()
            .register(&mut store, &ctx, "bool like", Address::ZERO, true)
            .unwrap();

        let record = registry().get_schema(&store, &uid).unwrap();
        assert_eq!(record.uid, uid);
        assert_eq!(record.schema, "bool like");
        assert!(record.revocable);
        assert!(!record.has_resolver());
        assert!(matches!(
            store.events(),
            [Event::Registered { registerer, .. }] if *registerer == ctx.sender
        ));
    }

    #[test]
    fn duplicate_registration_fails_without_event() {
        let mut store = MemoryStore::new();
        let ctx = CallContext::new(Address::ZERO, 1);
        registry()
            .register(&mut store, &ctx, "uint256 score", Address::ZERO, false)
            .unwrap();

        let again = registry().register(&mut store, &ctx, "uint256 score", Address::ZERO, false);
        assert_eq!(again, Err(EasError::AlreadyExists));
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn unknown_schema_is_empty() {
        let store = MemoryStore::new();
        assert!(registry()
            .get_schema(&store, &B256::repeat_byte(9))
            .unwrap()
            .is_empty());
    }
}
