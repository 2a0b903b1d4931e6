//! The attestation engine.

use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use eas_primitives::eip712::Eip712Domain;
use eas_primitives::uid::unique_attestation_uid;
use eas_primitives::utils::{EAS_NAME, EAS_VERSION, EMPTY_UID, NO_EXPIRATION_TIME};
use eas_primitives::{
    Attestation, AttestationRequest, AttestationRequestData, DelegatedAttestationRequest,
    DelegatedRevocationRequest, EasError, Event, MultiAttestationRequest,
    MultiDelegatedAttestationRequest, MultiDelegatedRevocationRequest, MultiRevocationRequest,
    Result, RevocationRequest, RevocationRequestData, SchemaRecord,
};
use tracing::{debug, info};

use crate::context::CallContext;
use crate::registry::SchemaRegistry;
use crate::resolver::ResolverDirectory;
use crate::store::tables::{self, ListKey, UidIndex};
use crate::store::{atomically, Store};
use crate::verifier::{Eip712Verifier, NonceStrategy};

/// UIDs created by one group of attestation requests and the value it consumed.
#[derive(Debug, Default)]
struct AttestationsResult {
    uids: Vec<B256>,
    used_value: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Attest,
    Revoke,
}

impl Resolution {
    fn rejected(self, batch: bool) -> EasError {
        match (self, batch) {
            (Resolution::Attest, false) => EasError::InvalidAttestation,
            (Resolution::Attest, true) => EasError::InvalidAttestations,
            (Resolution::Revoke, false) => EasError::InvalidRevocation,
            (Resolution::Revoke, true) => EasError::InvalidRevocations,
        }
    }
}

/// Creates, revokes and serves attestations against the schemas of one
/// registry.
#[derive(Debug)]
pub struct Eas {
    address: Address,
    registry: SchemaRegistry,
    verifier: Eip712Verifier<NonceStrategy>,
    resolvers: Arc<ResolverDirectory>,
}

impl Eas {
    /// Engine deployed at `address`, signing domain named "EAS" on `chain_id`.
    pub fn new(
        address: Address,
        chain_id: u64,
        registry: SchemaRegistry,
        resolvers: Arc<ResolverDirectory>,
    ) -> Self {
        let domain = Eip712Domain::new(EAS_NAME, EAS_VERSION, chain_id, address);
        Self {
            address,
            registry,
            verifier: Eip712Verifier::new(domain, NonceStrategy),
            resolvers,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn version(&self) -> &'static str {
        EAS_VERSION
    }

    pub fn get_schema_registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn verifier(&self) -> &Eip712Verifier<NonceStrategy> {
        &self.verifier
    }

    pub fn resolvers(&self) -> &Arc<ResolverDirectory> {
        &self.resolvers
    }

    /// Attest as the caller. `ctx.value` funds the schema's resolver.
    pub fn attest(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &AttestationRequest,
    ) -> Result<B256> {
        atomically(store, |store| {
            let res = self.attest_group(
                store,
                request.schema,
                std::slice::from_ref(&request.data),
                ctx.sender,
                ctx.timestamp,
                ctx.value,
            )?;
            Ok(res.uids[0])
        })
    }

    /// Attest on behalf of the signer of `request`, consuming one of its nonces.
    pub fn attest_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &DelegatedAttestationRequest,
    ) -> Result<B256> {
        atomically(store, |store| {
            self.verifier.verify_attest(store, ctx.timestamp, request)?;
            let res = self.attest_group(
                store,
                request.schema,
                std::slice::from_ref(&request.data),
                request.attester,
                ctx.timestamp,
                ctx.value,
            )?;
            Ok(res.uids[0])
        })
    }

    /// Attest every group as the caller in one transaction.
    ///
    /// One rejected item rolls back the whole batch. `ctx.value` is shared
    /// across groups in order; any rest stays with the caller.
    pub fn multi_attest(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiAttestationRequest],
    ) -> Result<Vec<B256>> {
        atomically(store, |store| {
            let mut available = ctx.value;
            let mut uids = Vec::new();
            for request in requests {
                if request.data.is_empty() {
                    return Err(EasError::InvalidLength);
                }
                let res = self.attest_group(
                    store,
                    request.schema,
                    &request.data,
                    ctx.sender,
                    ctx.timestamp,
                    available,
                )?;
                available -= res.used_value;
                uids.extend(res.uids);
            }
            Ok(uids)
        })
    }

    /// Like [`Eas::multi_attest`], with one signature and one nonce per item.
    pub fn multi_attest_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiDelegatedAttestationRequest],
    ) -> Result<Vec<B256>> {
        atomically(store, |store| {
            let mut available = ctx.value;
            let mut uids = Vec::new();
            for request in requests {
                if request.data.is_empty() || request.data.len() != request.signatures.len() {
                    return Err(EasError::InvalidLength);
                }
                for (data, signature) in request.data.iter().zip(&request.signatures) {
                    let single = DelegatedAttestationRequest {
                        schema: request.schema,
                        data: data.clone(),
                        signature: signature.clone(),
                        attester: request.attester,
                        deadline: request.deadline,
                    };
                    self.verifier.verify_attest(store, ctx.timestamp, &single)?;
                }
                let res = self.attest_group(
                    store,
                    request.schema,
                    &request.data,
                    request.attester,
                    ctx.timestamp,
                    available,
                )?;
                available -= res.used_value;
                uids.extend(res.uids);
            }
            Ok(uids)
        })
    }

    /// Revoke an attestation the caller made.
    pub fn revoke(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &RevocationRequest,
    ) -> Result<()> {
        atomically(store, |store| {
            self.revoke_group(
                store,
                request.schema,
                std::slice::from_ref(&request.data),
                ctx.sender,
                ctx.timestamp,
                ctx.value,
            )
            .map(drop)
        })
    }

    /// Revoke on behalf of the signer of `request`, consuming one of its nonces.
    pub fn revoke_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &DelegatedRevocationRequest,
    ) -> Result<()> {
        atomically(store, |store| {
            self.verifier.verify_revoke(store, ctx.timestamp, request)?;
            self.revoke_group(
                store,
                request.schema,
                std::slice::from_ref(&request.data),
                request.revoker,
                ctx.timestamp,
                ctx.value,
            )
            .map(drop)
        })
    }

    /// Revoke every group as the caller, all or nothing.
    pub fn multi_revoke(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiRevocationRequest],
    ) -> Result<()> {
        atomically(store, |store| {
            let mut available = ctx.value;
            for request in requests {
                if request.data.is_empty() {
                    return Err(EasError::InvalidLength);
                }
                available -= self.revoke_group(
                    store,
                    request.schema,
                    &request.data,
                    ctx.sender,
                    ctx.timestamp,
                    available,
                )?;
            }
            Ok(())
        })
    }

    /// Like [`Eas::multi_revoke`], with one signature and one nonce per item.
    pub fn multi_revoke_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiDelegatedRevocationRequest],
    ) -> Result<()> {
        atomically(store, |store| {
            let mut available = ctx.value;
            for request in requests {
                if request.data.is_empty() || request.data.len() != request.signatures.len() {
                    return Err(EasError::InvalidLength);
                }
                for (data, signature) in request.data.iter().zip(&request.signatures) {
                    let single = DelegatedRevocationRequest {
                        schema: request.schema,
                        data: data.clone(),
                        signature: signature.clone(),
                        revoker: request.revoker,
                        deadline: request.deadline,
                    };
                    self.verifier.verify_revoke(store, ctx.timestamp, &single)?;
                }
                available -= self.revoke_group(
                    store,
                    request.schema,
                    &request.data,
                    request.revoker,
                    ctx.timestamp,
                    available,
                )?;
            }
            Ok(())
        })
    }

    /// Record that `data` existed at the call's timestamp.
    pub fn timestamp(&self, store: &mut dyn Store, ctx: &CallContext, data: B256) -> Result<u64> {
        atomically(store, |store| self.timestamp_one(store, ctx.timestamp, data))
    }

    /// Timestamp every item at the call's timestamp, all or nothing.
    pub fn multi_timestamp(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        data: &[B256],
    ) -> Result<u64> {
        atomically(store, |store| {
            for item in data {
                self.timestamp_one(store, ctx.timestamp, *item)?;
            }
            Ok(ctx.timestamp)
        })
    }

    /// Revoke off-chain `data` on behalf of the caller.
    pub fn revoke_offchain(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        data: B256,
    ) -> Result<u64> {
        atomically(store, |store| {
            self.revoke_offchain_one(store, ctx.sender, ctx.timestamp, data)
        })
    }

    /// Revoke every item off-chain for the caller, all or nothing.
    pub fn multi_revoke_offchain(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        data: &[B256],
    ) -> Result<u64> {
        atomically(store, |store| {
            for item in data {
                self.revoke_offchain_one(store, ctx.sender, ctx.timestamp, *item)?;
            }
            Ok(ctx.timestamp)
        })
    }

    /// Raise the caller's nonce, voiding pending signatures over lower ones.
    pub fn increase_nonce(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        new_nonce: U256,
    ) -> Result<()> {
        atomically(store, |store| self.verifier.increase_nonce(store, ctx, new_nonce))
    }

    /// Stored attestation, or the empty record when `uid` is unknown.
    pub fn get_attestation(&self, store: &dyn Store, uid: &B256) -> Result<Attestation> {
        Ok(tables::attestation(store, uid)?.unwrap_or_default())
    }

    /// Whether an attestation with `uid` exists. Revoked and expired ones count.
    pub fn is_attestation_valid(&self, store: &dyn Store, uid: &B256) -> bool {
        tables::has_attestation(store, uid)
    }

    /// Time `data` was timestamped, 0 if never.
    pub fn get_timestamp(&self, store: &dyn Store, data: &B256) -> Result<u64> {
        tables::timestamp(store, data)
    }

    /// Time `revoker` revoked `data` off-chain, 0 if never.
    pub fn get_revoke_offchain(
        &self,
        store: &dyn Store,
        revoker: Address,
        data: &B256,
    ) -> Result<u64> {
        tables::offchain_revocation(store, revoker, data)
    }

    /// Next nonce a delegated request signed by `account` must carry.
    pub fn get_nonce(&self, store: &dyn Store, account: Address) -> Result<U256> {
        self.verifier.get_nonce(store, account)
    }

    pub fn get_domain_separator(&self) -> B256 {
        self.verifier.get_domain_separator()
    }

    /// Page of attestations indexed for `recipient` under `schema`, oldest first
    /// unless `reverse_order`.
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

    /// Page of attestations `attester` made under `schema`.
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

    /// Page of every attestation made under `schema`.
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

    /// Attestations referencing `uid` through their `refUID`.
    pub fn get_related_attestation_uids(
        &self,
        store: &dyn Store,
        uid: B256,
        start: u64,
        length: u64,
        reverse_order: bool,
    ) -> Result<Vec<B256>> {
        let list = self.list(UidIndex::Related { uid });
        tables::page(store, &list, start, length, reverse_order)
    }

    pub fn get_related_attestation_uid_count(&self, store: &dyn Store, uid: B256) -> Result<u64> {
        tables::list_len(store, &self.list(UidIndex::Related { uid }))
    }

    fn list(&self, index: UidIndex) -> ListKey {
        ListKey::new(self.address, index)
    }

    fn schema_record(&self, store: &dyn Store, schema: &B256) -> Result<SchemaRecord> {
        let record = self.registry.get_schema(store, schema)?;
        if record.is_empty() {
            return Err(EasError::InvalidSchema);
        }
        Ok(record)
    }

    fn attest_group(
        &self,
        store: &mut dyn Store,
        schema: B256,
        data: &[AttestationRequestData],
        attester: Address,
        now: u64,
        available: U256,
    ) -> Result<AttestationsResult> {
        let record = self.schema_record(store, &schema)?;

        let mut attestations = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());
        let mut res = AttestationsResult::default();

        for request in data {
            if request.expirationTime != NO_EXPIRATION_TIME && request.expirationTime <= now {
                return Err(EasError::InvalidExpirationTime);
            }
            if !record.revocable && request.revocable {
                return Err(EasError::Irrevocable);
            }

            let mut attestation = Attestation {
                uid: EMPTY_UID,
                schema,
                time: now,
                expirationTime: request.expirationTime,
                revocationTime: 0,
                refUID: request.refUID,
                recipient: request.recipient,
                attester,
                revocable: request.revocable,
                data: request.data.clone(),
            };
            attestation.uid = unique_attestation_uid(&attestation, |uid| {
                Ok::<_, EasError>(tables::has_attestation(&*store, uid))
            })?;
            tables::put_attestation(store, &attestation);

            if request.refUID != EMPTY_UID {
                if !tables::has_attestation(store, &request.refUID) {
                    return Err(EasError::NotFound);
                }
                self.push(store, UidIndex::Related { uid: request.refUID }, &attestation.uid)?;
            }
            self.push(
                store,
                UidIndex::Received {
                    recipient: request.recipient,
                    schema,
                },
                &attestation.uid,
            )?;
            self.push(store, UidIndex::Sent { attester, schema }, &attestation.uid)?;
            self.push(store, UidIndex::Schema { schema }, &attestation.uid)?;

            store.emit(Event::Attested {
                recipient: request.recipient,
                attester,
                uid: attestation.uid,
                schema,
            });
            info!(uid = %attestation.uid, %schema, %attester, "attested");

            res.uids.push(attestation.uid);
            values.push(request.value);
            attestations.push(attestation);
        }

        res.used_value =
            self.resolve(store, &record, &attestations, &values, Resolution::Attest, available)?;
        Ok(res)
    }

    /// Revoke one group and return the value it consumed.
    fn revoke_group(
        &self,
        store: &mut dyn Store,
        schema: B256,
        data: &[RevocationRequestData],
        revoker: Address,
        now: u64,
        available: U256,
    ) -> Result<U256> {
        let record = self.schema_record(store, &schema)?;

        let mut attestations = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());

        for request in data {
            let mut attestation =
                tables::attestation(store, &request.uid)?.ok_or(EasError::NotFound)?;
            if attestation.schema != schema {
                return Err(EasError::InvalidSchema);
            }
            if attestation.attester != revoker {
                return Err(EasError::AccessDenied);
            }
            if !attestation.revocable {
                return Err(EasError::Irrevocable);
            }
            if attestation.is_revoked() {
                return Err(EasError::AlreadyRevoked);
            }

            attestation.revocationTime = now;
            tables::put_attestation(store, &attestation);

            store.emit(Event::Revoked {
                recipient: attestation.recipient,
                revoker,
                uid: attestation.uid,
                schema,
            });
            info!(uid = %attestation.uid, %schema, %revoker, "revoked");

            values.push(request.value);
            attestations.push(attestation);
        }

        self.resolve(store, &record, &attestations, &values, Resolution::Revoke, available)
    }

    /// Run the schema's resolver over one group and return the value forwarded
    /// to it.
    fn resolve(
        &self,
        store: &mut dyn Store,
        record: &SchemaRecord,
        attestations: &[Attestation],
        values: &[U256],
        kind: Resolution,
        available: U256,
    ) -> Result<U256> {
        if !record.has_resolver() {
            if values.iter().any(|value| !value.is_zero()) {
                return Err(EasError::NotPayable);
            }
            return Ok(U256::ZERO);
        }

        let resolver = self.resolvers.get(record.resolver)?;
        let mut remaining = available;
        let mut used = U256::ZERO;
        for value in values.iter().filter(|value| !value.is_zero()) {
            if !resolver.is_payable() {
                return Err(EasError::NotPayable);
            }
            if *value > remaining {
                return Err(EasError::InsufficientValue);
            }
            remaining -= *value;
            used += *value;
        }
        if !used.is_zero() {
            tables::credit(store, record.resolver, used)?;
        }

        let batch = attestations.len() != 1;
        debug!(resolver = %record.resolver, count = attestations.len(), %used, ?kind, "resolving");
        let accepted = match (kind, batch) {
            (Resolution::Attest, false) => {
                resolver.attest(store, self.address, &attestations[0], values[0])?
            }
            (Resolution::Revoke, false) => {
                resolver.revoke(store, self.address, &attestations[0], values[0])?
            }
            (Resolution::Attest, true) => {
                resolver.multi_attest(store, self.address, attestations, values, used)?
            }
            (Resolution::Revoke, true) => {
                resolver.multi_revoke(store, self.address, attestations, values, used)?
            }
        };
        if !accepted {
            return Err(kind.rejected(batch));
        }
        Ok(used)
    }

    fn push(&self, store: &mut dyn Store, index: UidIndex, uid: &B256) -> Result<()> {
        tables::push_uid(store, &self.list(index), uid)
    }

    fn timestamp_one(&self, store: &mut dyn Store, now: u64, data: B256) -> Result<u64> {
        if tables::is_timestamped(store, &data) {
            return Err(EasError::AlreadyTimestamped);
        }
        tables::set_timestamp(store, &data, now);
        store.emit(Event::Timestamped {
            data,
            timestamp: now,
        });
        Ok(now)
    }

    fn revoke_offchain_one(
        &self,
        store: &mut dyn Store,
        revoker: Address,
        now: u64,
        data: B256,
    ) -> Result<u64> {
        if tables::is_revoked_offchain(store, revoker, &data) {
            return Err(EasError::AlreadyRevokedOffchain);
        }
        tables::set_offchain_revocation(store, revoker, &data, now);
        store.emit(Event::RevokedOffchain {
            revoker,
            data,
            timestamp: now,
        });
        Ok(now)
    }
}
