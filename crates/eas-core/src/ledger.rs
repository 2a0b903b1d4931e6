//! One deployment of the attestation components over a single store.

use std::sync::Arc;

use alloy::primitives::{address, Address};
use eas_primitives::Event;
use serde::{Deserialize, Serialize};

use crate::eas::Eas;
use crate::indexer::Indexer;
use crate::proxy::Eip712Proxy;
use crate::registry::SchemaRegistry;
use crate::resolver::ResolverDirectory;
use crate::store::{MemoryStore, Store};

/// Addresses and signing parameters of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub chain_id: u64,
    pub registry: Address,
    pub eas: Address,
    pub proxy: Address,
    pub proxy_name: String,
    pub indexer: Address,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            registry: address!("a7b39296258348c78294f95b872b282326a97bdf"),
            eas: address!("4200000000000000000000000000000000000021"),
            proxy: address!("4200000000000000000000000000000000000022"),
            proxy_name: "EIP712Proxy".to_string(),
            indexer: address!("4200000000000000000000000000000000000023"),
        }
    }
}

/// Registry, engine, proxy and indexer sharing one store and resolver
/// directory.
#[derive(Debug)]
pub struct Ledger<S = MemoryStore> {
    store: S,
    resolvers: Arc<ResolverDirectory>,
    eas: Arc<Eas>,
    proxy: Eip712Proxy,
    indexer: Indexer,
}

impl<S: Store> Ledger<S> {
    pub fn new(deployment: &Deployment, store: S) -> Self {
        let resolvers = Arc::new(ResolverDirectory::new());
        let registry = SchemaRegistry::new(deployment.registry);
        let eas = Arc::new(Eas::new(
            deployment.eas,
            deployment.chain_id,
            registry,
            resolvers.clone(),
        ));
        let proxy = Eip712Proxy::new(
            deployment.proxy,
            &deployment.proxy_name,
            deployment.chain_id,
            eas.clone(),
        );
        let indexer = Indexer::new(deployment.indexer, eas.clone());

        Self {
            store,
            resolvers,
            eas,
            proxy,
            indexer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.eas.get_schema_registry()
    }

    pub fn eas(&self) -> &Eas {
        &self.eas
    }

    pub fn proxy(&self) -> &Eip712Proxy {
        &self.proxy
    }

    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    pub fn resolvers(&self) -> &ResolverDirectory {
        &self.resolvers
    }

    /// Split borrow for calling a component with the store.
    ///
    /// ```ignore
    /// let (eas, store) = ledger.eas_with_store();
    /// eas.attest(store, &ctx, &request)?;
    /// ```
    pub fn eas_with_store(&mut self) -> (&Eas, &mut dyn Store) {
        (&self.eas, &mut self.store)
    }

    pub fn proxy_with_store(&mut self) -> (&Eip712Proxy, &mut dyn Store) {
        (&self.proxy, &mut self.store)
    }

    pub fn indexer_with_store(&mut self) -> (&Indexer, &mut dyn Store) {
        (&self.indexer, &mut self.store)
    }

    pub fn events(&self) -> &[Event] {
        self.store.events()
    }
}

impl Default for Ledger<MemoryStore> {
    fn default() -> Self {
        Self::new(&Deployment::default(), MemoryStore::new())
    }
}
