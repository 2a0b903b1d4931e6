//! Typed tables layered over the raw [`Store`] byte interface.
//!
//! Keys are a one-byte table tag followed by the fixed-width key fields.
//! Values are ABI encoded.

use std::fmt::Display;

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolValue;
use eas_primitives::{Attestation, EasError, Result, SchemaRecord};

use super::Store;

/// A UID list maintained by the engine or the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UidIndex {
    Received { recipient: Address, schema: B256 },
    Sent { attester: Address, schema: B256 },
    Schema { schema: B256 },
    SchemaAttesterRecipient {
        schema: B256,
        attester: Address,
        recipient: Address,
    },
    /// Attestations whose `refUID` points at `uid`.
    Related { uid: B256 },
}

impl UidIndex {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            UidIndex::Received { recipient, schema } => {
                out.push(0);
                out.extend_from_slice(recipient.as_slice());
                out.extend_from_slice(schema.as_slice());
            }
            UidIndex::Sent { attester, schema } => {
                out.push(1);
                out.extend_from_slice(attester.as_slice());
                out.extend_from_slice(schema.as_slice());
            }
            UidIndex::Schema { schema } => {
                out.push(2);
                out.extend_from_slice(schema.as_slice());
            }
            UidIndex::SchemaAttesterRecipient {
                schema,
                attester,
                recipient,
            } => {
                out.push(3);
                out.extend_from_slice(schema.as_slice());
                out.extend_from_slice(attester.as_slice());
                out.extend_from_slice(recipient.as_slice());
            }
            UidIndex::Related { uid } => {
                out.push(4);
                out.extend_from_slice(uid.as_slice());
            }
        }
    }
}

/// A [`UidIndex`] owned by the component at `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListKey {
    pub scope: Address,
    pub index: UidIndex,
}

impl ListKey {
    pub fn new(scope: Address, index: UidIndex) -> Self {
        Self { scope, index }
    }
}

#[derive(Debug, Clone, Copy)]
enum Key<'a> {
    Schema(&'a B256),
    Attestation(&'a B256),
    Nonce(Address, Address),
    UsedDigest(Address, &'a B256),
    Timestamp(&'a B256),
    OffchainRevocation(Address, &'a B256),
    ProxyAttester(Address, &'a B256),
    ListLength(&'a ListKey),
    ListItem(&'a ListKey, u64),
    Indexed(Address, &'a B256),
    Balance(Address),
}

impl Key<'_> {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(80);
        match self {
            Key::Schema(uid) => {
                out.push(0x01);
                out.extend_from_slice(uid.as_slice());
            }
            Key::Attestation(uid) => {
                out.push(0x02);
                out.extend_from_slice(uid.as_slice());
            }
            Key::Nonce(scope, account) => {
                out.push(0x03);
                out.extend_from_slice(scope.as_slice());
                out.extend_from_slice(account.as_slice());
            }
            Key::UsedDigest(scope, digest) => {
                out.push(0x04);
                out.extend_from_slice(scope.as_slice());
                out.extend_from_slice(digest.as_slice());
            }
            Key::Timestamp(data) => {
                out.push(0x05);
                out.extend_from_slice(data.as_slice());
            }
            Key::OffchainRevocation(revoker, data) => {
                out.push(0x06);
                out.extend_from_slice(revoker.as_slice());
                out.extend_from_slice(data.as_slice());
            }
            Key::ProxyAttester(scope, uid) => {
                out.push(0x07);
                out.extend_from_slice(scope.as_slice());
                out.extend_from_slice(uid.as_slice());
            }
            Key::ListLength(list) => {
                out.push(0x08);
                out.extend_from_slice(list.scope.as_slice());
                list.index.encode(&mut out);
            }
            Key::ListItem(list, position) => {
                out.push(0x09);
                out.extend_from_slice(list.scope.as_slice());
                list.index.encode(&mut out);
                out.extend_from_slice(&position.to_be_bytes());
            }
            Key::Indexed(scope, uid) => {
                out.push(0x0a);
                out.extend_from_slice(scope.as_slice());
                out.extend_from_slice(uid.as_slice());
            }
            Key::Balance(account) => {
                out.push(0x0b);
                out.extend_from_slice(account.as_slice());
            }
        }
        out
    }
}

fn corrupt(key: &Key<'_>, err: impl Display) -> EasError {
    EasError::StorageError(format!("undecodable value at {key:?}: {err}"))
}

fn read_u64(store: &dyn Store, key: Key<'_>) -> Result<u64> {
    match store.get(&key.encode()) {
        Some(bytes) => u64::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)),
        None => Ok(0),
    }
}

fn read_u256(store: &dyn Store, key: Key<'_>) -> Result<U256> {
    match store.get(&key.encode()) {
        Some(bytes) => U256::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)),
        None => Ok(U256::ZERO),
    }
}

fn read_b256(store: &dyn Store, key: Key<'_>) -> Result<B256> {
    match store.get(&key.encode()) {
        Some(bytes) => B256::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)),
        None => Ok(B256::ZERO),
    }
}

fn mark(store: &mut dyn Store, key: Key<'_>) {
    store.set(key.encode(), true.abi_encode());
}

pub fn schema(store: &dyn Store, uid: &B256) -> Result<Option<SchemaRecord>> {
    let key = Key::Schema(uid);
    store
        .get(&key.encode())
        .map(|bytes| SchemaRecord::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)))
        .transpose()
}

pub fn put_schema(store: &mut dyn Store, record: &SchemaRecord) {
    store.set(Key::Schema(&record.uid).encode(), record.abi_encode());
}

pub fn attestation(store: &dyn Store, uid: &B256) -> Result<Option<Attestation>> {
    let key = Key::Attestation(uid);
    store
        .get(&key.encode())
        .map(|bytes| Attestation::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)))
        .transpose()
}

pub fn has_attestation(store: &dyn Store, uid: &B256) -> bool {
    store.contains(&Key::Attestation(uid).encode())
}

pub fn put_attestation(store: &mut dyn Store, attestation: &Attestation) {
    store.set(
        Key::Attestation(&attestation.uid).encode(),
        attestation.abi_encode(),
    );
}

pub fn nonce(store: &dyn Store, scope: Address, account: Address) -> Result<U256> {
    read_u256(store, Key::Nonce(scope, account))
}

pub fn set_nonce(store: &mut dyn Store, scope: Address, account: Address, nonce: U256) {
    store.set(Key::Nonce(scope, account).encode(), nonce.abi_encode());
}

pub fn is_digest_used(store: &dyn Store, scope: Address, digest: &B256) -> bool {
    store.contains(&Key::UsedDigest(scope, digest).encode())
}

pub fn mark_digest_used(store: &mut dyn Store, scope: Address, digest: &B256) {
    mark(store, Key::UsedDigest(scope, digest));
}

/// Time `data` was timestamped, 0 if never.
pub fn timestamp(store: &dyn Store, data: &B256) -> Result<u64> {
    read_u64(store, Key::Timestamp(data))
}

/// Whether `data` was timestamped, including at time 0.
pub fn is_timestamped(store: &dyn Store, data: &B256) -> bool {
    store.contains(&Key::Timestamp(data).encode())
}

pub fn set_timestamp(store: &mut dyn Store, data: &B256, time: u64) {
    store.set(Key::Timestamp(data).encode(), time.abi_encode());
}

/// Time `revoker` revoked `data` offchain, 0 if never.
pub fn offchain_revocation(store: &dyn Store, revoker: Address, data: &B256) -> Result<u64> {
    read_u64(store, Key::OffchainRevocation(revoker, data))
}

pub fn is_revoked_offchain(store: &dyn Store, revoker: Address, data: &B256) -> bool {
    store.contains(&Key::OffchainRevocation(revoker, data).encode())
}

pub fn set_offchain_revocation(store: &mut dyn Store, revoker: Address, data: &B256, time: u64) {
    store.set(
        Key::OffchainRevocation(revoker, data).encode(),
        time.abi_encode(),
    );
}

/// Original signer of an attestation made through the proxy at `scope`, zero if
/// unknown.
pub fn proxy_attester(store: &dyn Store, scope: Address, uid: &B256) -> Result<Address> {
    let key = Key::ProxyAttester(scope, uid);
    match store.get(&key.encode()) {
        Some(bytes) => Address::abi_decode(&bytes, true).map_err(|e| corrupt(&key, e)),
        None => Ok(Address::ZERO),
    }
}

pub fn set_proxy_attester(store: &mut dyn Store, scope: Address, uid: &B256, attester: Address) {
    store.set(Key::ProxyAttester(scope, uid).encode(), attester.abi_encode());
}

pub fn is_indexed(store: &dyn Store, scope: Address, uid: &B256) -> bool {
    store.contains(&Key::Indexed(scope, uid).encode())
}

pub fn mark_indexed(store: &mut dyn Store, scope: Address, uid: &B256) {
    mark(store, Key::Indexed(scope, uid));
}

/// Value forwarded to `account` so far.
pub fn balance(store: &dyn Store, account: Address) -> Result<U256> {
    read_u256(store, Key::Balance(account))
}

pub fn credit(store: &mut dyn Store, account: Address, amount: U256) -> Result<()> {
    let balance = balance(store, account)?
        .checked_add(amount)
        .ok_or_else(|| EasError::StorageError(format!("balance overflow for {account}")))?;
    store.set(Key::Balance(account).encode(), balance.abi_encode());
    Ok(())
}

pub fn list_len(store: &dyn Store, list: &ListKey) -> Result<u64> {
    read_u64(store, Key::ListLength(list))
}

pub fn push_uid(store: &mut dyn Store, list: &ListKey, uid: &B256) -> Result<()> {
    let len = list_len(store, list)?;
    store.set(Key::ListItem(list, len).encode(), uid.abi_encode());
    store.set(Key::ListLength(list).encode(), (len + 1).abi_encode());
    Ok(())
}

pub fn uid_at(store: &dyn Store, list: &ListKey, position: u64) -> Result<B256> {
    read_b256(store, Key::ListItem(list, position))
}

/// Page through a UID list, see [`eas_primitives::pagination::page_positions`].
pub fn page(
    store: &dyn Store,
    list: &ListKey,
    start: u64,
    length: u64,
    reverse_order: bool,
) -> Result<Vec<B256>> {
    let len = list_len(store, list)?;
    eas_primitives::pagination::page_positions(len, start, length, reverse_order)?
        .into_iter()
        .map(|position| uid_at(store, list, position))
        .collect()
}
