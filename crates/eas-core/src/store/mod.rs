//! Transactional key-value storage shared by every attestation component.
//!
//! Components never hold state of their own: they read and write through a
//! [`Store`] handed to each call, and group multi-step operations with
//! [`atomically`] so that a failed precondition leaves no partial writes and no
//! events behind.

pub mod memory;
pub mod tables;

use eas_primitives::{Event, Result};

pub use memory::MemoryStore;

/// Position in a store's undo log and event outbox that can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    undo_log_index: usize,
    events_index: usize,
}

impl Checkpoint {
    pub fn new(undo_log_index: usize, events_index: usize) -> Self {
        Self {
            undo_log_index,
            events_index,
        }
    }

    pub fn undo_log_index(&self) -> usize {
        self.undo_log_index
    }

    pub fn events_index(&self) -> usize {
        self.events_index
    }
}

/// Byte-keyed store with nested transactions and an event outbox.
///
/// Every `begin` must be matched by exactly one `commit` or `rollback` with the
/// returned checkpoint, innermost first.
pub trait Store: Send + Sync {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Append an event to the outbox. Rolled back together with writes.
    fn emit(&mut self, event: Event);

    /// Committed and pending events, in emission order.
    fn events(&self) -> &[Event];

    fn begin(&mut self) -> Checkpoint;

    fn commit(&mut self, checkpoint: Checkpoint);

    fn rollback(&mut self, checkpoint: Checkpoint);

    fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Run `op` as one transaction: its writes and events are kept on `Ok` and
/// discarded on `Err`.
pub fn atomically<T>(
    store: &mut dyn Store,
    op: impl FnOnce(&mut dyn Store) -> Result<T>,
) -> Result<T> {
    let checkpoint = store.begin();
    match op(store) {
        Ok(value) => {
            store.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            store.rollback(checkpoint);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;
    use eas_primitives::EasError;

    #[test]
    fn failed_transaction_leaves_no_trace() {
        let mut store = MemoryStore::default();
        store.set(b"kept".to_vec(), b"1".to_vec());

        let result: Result<()> = atomically(&mut store, |store| {
            store.set(b"kept".to_vec(), b"2".to_vec());
            store.set(b"dropped".to_vec(), b"3".to_vec());
            store.emit(Event::Indexed { uid: B256::ZERO });
            Err(EasError::NotFound)
        });

        assert_eq!(result, Err(EasError::NotFound));
        assert_eq!(store.get(b"kept"), Some(b"1".to_vec()));
        assert_eq!(store.get(b"dropped"), None);
        assert!(store.events().is_empty());
    }

    #[test]
    fn inner_failure_keeps_outer_writes() {
        let mut store = MemoryStore::default();

        atomically(&mut store, |store| {
            store.set(b"outer".to_vec(), b"1".to_vec());
            let inner: Result<()> = atomically(store, |store| {
                store.set(b"inner".to_vec(), b"2".to_vec());
                Err(EasError::AccessDenied)
            });
            assert!(inner.is_err());
            Ok(())
        })
        .unwrap();

        assert_eq!(store.get(b"outer"), Some(b"1".to_vec()));
        assert_eq!(store.get(b"inner"), None);
    }

    #[test]
    fn outer_failure_reverts_committed_inner_writes() {
        let mut store = MemoryStore::default();

        let result: Result<()> = atomically(&mut store, |store| {
            atomically(store, |store| {
                store.set(b"inner".to_vec(), b"2".to_vec());
                store.emit(Event::Indexed { uid: B256::ZERO });
                Ok(())
            })?;
            Err(EasError::InvalidLength)
        });

        assert!(result.is_err());
        assert_eq!(store.get(b"inner"), None);
        assert!(store.events().is_empty());
    }
}
