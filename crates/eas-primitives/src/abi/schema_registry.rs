use alloy::sol;
use serde::{Deserialize, Serialize};

use crate::utils::EMPTY_UID;

sol! {
    /// A registered schema. The zero-valued record stands for "no such schema".
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct SchemaRecord {
        bytes32 uid;
        address resolver;
        bool revocable;
        string schema;
    }
}

impl SchemaRecord {
    /// True for the empty record returned on lookup misses.
    pub fn is_empty(&self) -> bool {
        self.uid == EMPTY_UID
    }

    /// Whether a resolver is attached to this schema.
    pub fn has_resolver(&self) -> bool {
        !self.resolver.is_zero()
    }
}
