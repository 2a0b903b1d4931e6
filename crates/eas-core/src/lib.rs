//! Attestation service state machine: schema registry, attestation engine,
//! delegation proxy and indexer over a transactional key-value store.

pub mod context;
pub mod eas;
pub mod indexer;
pub mod ledger;
pub mod proxy;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod verifier;

pub use context::CallContext;
pub use eas::Eas;
pub use indexer::Indexer;
pub use ledger::{Deployment, Ledger};
pub use proxy::Eip712Proxy;
pub use registry::SchemaRegistry;
pub use resolver::{ResolverDirectory, SchemaResolver};
pub use store::{atomically, MemoryStore, Store};
pub use verifier::{Eip712Verifier, NonceStrategy, ReplayStrategy, UsedSignatureStrategy};
