use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Caller identity, attached value and clock for one call into a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub sender: Address,
    #[serde(default)]
    pub value: U256,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self {
            sender,
            value: U256::ZERO,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Same call forwarded by `sender`, e.g. the proxy calling the engine.
    #[must_use]
    pub fn forwarded_by(self, sender: Address) -> Self {
        Self { sender, ..self }
    }
}
