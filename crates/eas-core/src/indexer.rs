//! Secondary lookup tables built from committed attestations.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use eas_primitives::utils::INDEXER_VERSION;
use eas_primitives::{EasError, Event, Result};
use tracing::{debug, info};

use crate::eas::Eas;
use crate::store::tables::{self, ListKey, UidIndex};
use crate::store::{atomically, Store};

/// Indexes attestations by recipient, attester and schema. Reads the engine,
/// never writes to it.
#[derive(Debug)]
pub struct Indexer {
    address: Address,
    eas: Arc<Eas>,
}

impl Indexer {
    pub fn new(address: Address, eas: Arc<Eas>) -> Self {
        Self { address, eas }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn version(&self) -> &'static str {
        INDEXER_VERSION
    }

    pub fn get_eas(&self) -> &Arc<Eas> {
        &self.eas
    }

    pub fn index_attestation(&self, store: &mut dyn Store, uid: B256) -> Result<()> {
        atomically(store, |store| self.index(store, uid))
    }

    pub fn index_attestations(&self, store: &mut dyn Store, uids: &[B256]) -> Result<()> {
        atomically(store, |store| {
            for uid in uids {
                self.index(store, *uid)?;
            }
            Ok(())
        })
    }

    pub fn is_attestation_indexed(&self, store: &dyn Store, uid: &B256) -> bool {
        tables::is_indexed(store, self.address, uid)
    }

    /// Index every attestation announced in the outbox from position `from` on
    /// and return the position to resume from.
    pub fn sync(&self, store: &mut dyn Store, from: usize) -> Result<usize> {
        let pending = store.events().get(from..).ok_or(EasError::InvalidOffset)?;
        let uids: Vec<B256> = pending
            .iter()
            .filter_map(|event| match event {
                Event::Attested { uid, .. } => Some(*uid),
                _ => None,
            })
            .collect();

        debug!(from, count = uids.len(), "syncing indexer");
        self.index_attestations(store, &uids)?;
        Ok(store.events().len())
    }

    pub fn get_received_attestation_uids(
        &self,
        store: &dyn Store,
        recipient: Address,
        schema: B256,
        start: u64,
        length: u64,
        reverse_order: bool,
    ) -> Result<Vec<B256>> {
        let list = self.list(UidIndex::Received { recipient, schema });
        tables::page(store, &list, start, length, reverse_order)
    }

    pub fn get_received_attestation_uid_count(
        &self,
        store: &dyn Store,
        recipient: Address,
        schema: B256,
    ) -> Result<u64> {
        tables::list_len(store, &self.list(UidIndex::Received { recipient, schema }))
    }

    pub fn get_sent_attestation_uids(
        &self,
        store: &dyn Store,
        attester: Address,
        schema: B256,
        start: u64,
        length: u64,
        reverse_order: bool,
    ) -> Result<Vec<B256>> {
        let list = self.list(UidIndex::Sent { attester, schema });
        tables::page(store, &list, start, length, reverse_order)
    }

    pub fn get_sent_attestation_uid_count(
        &self,
        store: &dyn Store,
        attester: Address,
        schema: B256,
    ) -> Result<u64> {
        tables::list_len(store, &self.list(UidIndex::Sent { attester, schema }))
    }

    pub fn get_schema_attester_recipient_attestation_uids(
        &self,
        store: &dyn Store,
        schema: B256,
        attester: Address,
        recipient: Address,
        start: u64,
        length: u64,
        reverse_order: bool,
    ) -> Result<Vec<B256>> {
        let list = self.list(UidIndex::SchemaAttesterRecipient {
            schema,
            attester,
            recipient,
        });
        tables::page(store, &list, start, length, reverse_order)
    }

    pub fn get_schema_attester_recipient_attestation_uid_count(
        &self,
        store: &dyn Store,
        schema: B256,
        attester: Address,
        recipient: Address,
    ) -> Result<u64> {
        let list = self.list(UidIndex::SchemaAttesterRecipient {
            schema,
            attester,
            recipient,
        });
        tables::list_len(store, &list)
    }

    pub fn get_schema_attestation_uids(
        &self,
        store: &dyn Store,
        schema: B256,
        start: u64,
        length: u64,
        reverse_order: bool,
    ) -> Result<Vec<B256>> {
        let list = self.list(UidIndex::Schema { schema });
        tables::page(store, &list, start, length, reverse_order)
    }

    pub fn get_schema_attestation_uid_count(&self, store: &dyn Store, schema: B256) -> Result<u64> {
        tables::list_len(store, &self.list(UidIndex::Schema { schema }))
    }

    fn list(&self, index: UidIndex) -> ListKey {
        ListKey::new(self.address, index)
    }

    fn index(&self, store: &mut dyn Store, uid: B256) -> Result<()> {
        if self.is_attestation_indexed(store, &uid) {
            return Ok(());
        }

        let attestation = self.eas.get_attestation(store, &uid)?;
        if attestation.is_empty() {
            return Err(EasError::InvalidAttestation);
        }

        let lists = [
            UidIndex::Received {
                recipient: attestation.recipient,
                schema: attestation.schema,
            },
            UidIndex::Sent {
                attester: attestation.attester,
                schema: attestation.schema,
            },
            UidIndex::SchemaAttesterRecipient {
                schema: attestation.schema,
                attester: attestation.attester,
                recipient: attestation.recipient,
            },
            UidIndex::Schema {
                schema: attestation.schema,
            },
        ];
        for index in lists {
            tables::push_uid(store, &self.list(index), &uid)?;
        }

        tables::mark_indexed(store, self.address, &uid);
        store.emit(Event::Indexed { uid });
        info!(%uid, "attestation indexed");
        Ok(())
    }
}
