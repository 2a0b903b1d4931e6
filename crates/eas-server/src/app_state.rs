use std::sync::Arc;

use chrono::Utc;
use eas_core::Ledger;
use eas_primitives::Event;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::subscription_manager::SubscriptionManager;

/// Every topic a client can subscribe to.
pub const EVENT_TOPICS: [&str; 7] = [
    "Registered",
    "Attested",
    "Revoked",
    "Timestamped",
    "RevokedOffchain",
    "NonceIncreased",
    "Indexed",
];

struct LedgerState {
    ledger: Ledger,
    /// Outbox position up to which events have been broadcast.
    published: usize,
}

#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<LedgerState>>,
    subscription_manager: Arc<SubscriptionManager<Event>>,
}

impl AppState {
    pub async fn new(
        ledger: Ledger,
        subscription_manager: Arc<SubscriptionManager<Event>>,
    ) -> Self {
        subscription_manager.init_channels(&EVENT_TOPICS).await;
        let published = ledger.events().len();
        Self {
            ledger: Arc::new(Mutex::new(LedgerState { ledger, published })),
            subscription_manager,
        }
    }

    pub fn subscription_manager(&self) -> Arc<SubscriptionManager<Event>> {
        self.subscription_manager.clone()
    }

    /// Run a state-changing call against the ledger at the current time, then
    /// broadcast whatever it appended to the outbox.
    ///
    /// Calls are serialized; a failed call appends nothing.
    pub async fn write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger, u64) -> eas_primitives::Result<T>,
    {
        let mut state = self.ledger.lock().await;
        let result = op(&mut state.ledger, now());

        let fresh = state.ledger.events()[state.published..].to_vec();
        state.published += fresh.len();
        // still under the lock so subscribers see outbox order
        for event in fresh {
            let topic = event.name();
            match self.subscription_manager.broadcast(topic, event).await {
                Ok(receivers) => tracing::debug!(topic, receivers, "event broadcast"),
                Err(e) => tracing::debug!(topic, "event not delivered: {}", e),
            }
        }

        Ok(result?)
    }

    pub async fn read<T, F>(&self, op: F) -> T
    where
        F: FnOnce(&Ledger, u64) -> T,
    {
        let state = self.ledger.lock().await;
        op(&state.ledger, now())
    }
}

fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
