use std::collections::HashMap;

use eas_primitives::Event;

use super::{Checkpoint, Store};

/// One write to the map, kept so it can be undone.
#[derive(Debug, Clone)]
struct Undo {
    key: Vec<u8>,
    /// Value before the write, `None` if the key was absent.
    previous: Option<Vec<u8>>,
}

impl Undo {
    fn revert(self, entries: &mut HashMap<Vec<u8>, Vec<u8>>) {
        match self.previous {
            Some(value) => {
                entries.insert(self.key, value);
            }
            None => {
                entries.remove(&self.key);
            }
        }
    }
}

/// In-process [`Store`] backed by a hash map and an undo log.
///
/// The undo log only grows while a transaction is open and is cleared when the
/// outermost one commits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<Vec<u8>, Vec<u8>>,
    undo_log: Vec<Undo>,
    events: Vec<Event>,
    open_transactions: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        let previous = self.entries.insert(key.clone(), value);
        if self.open_transactions > 0 {
            self.undo_log.push(Undo { key, previous });
        }
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn events(&self) -> &[Event] {
        &self.events
    }

    fn begin(&mut self) -> Checkpoint {
        self.open_transactions += 1;
        Checkpoint::new(self.undo_log.len(), self.events.len())
    }

    fn commit(&mut self, _checkpoint: Checkpoint) {
        self.open_transactions = self.open_transactions.saturating_sub(1);
        if self.open_transactions == 0 {
            self.undo_log.clear();
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.undo_log.len() > checkpoint.undo_log_index() {
            if let Some(undo) = self.undo_log.pop() {
                undo.revert(&mut self.entries);
            }
        }
        self.events.truncate(checkpoint.events_index());
        self.open_transactions = self.open_transactions.saturating_sub(1);
    }
}
