use alloy::primitives::{Bytes, B256};
use common::fixtures::*;
use common::helpers::*;
use eas_core::Ledger;
use eas_primitives::{AttestationRequestData, EasError, Event};
use rstest::*;

mod common;

fn attest_n(ledger: &mut Ledger, schema: B256, n: u8) -> Vec<B256> {
    (0..n)
        .map(|i| {
            let data = AttestationRequestData {
                data: Bytes::from(vec![i]),
                ..request_data(BOB)
            };
            attest(ledger, ALICE, schema, data).unwrap()
        })
        .collect()
}

#[rstest]
fn test_index_attestation(with_schema: (Ledger, B256)) {
    let (mut ledger, schema) = with_schema;
    let uid = attest(&mut ledger, ALICE, schema, request_data(BOB)).unwrap();

    let (indexer, store) = ledger.indexer_with_store();
    indexer.index_attestation(store, uid).unwrap();
    assert!(indexer.is_attestation_indexed(store, &uid));
    assert_eq!(store.events().last(), Some(&Event::Indexed { uid }));

    let indexer = ledger.indexer();
    let store = ledger.store();
    assert_eq!(
        indexer
            .get_received_attestation_uids(store, BOB, schema, 0, 10, false)
            .unwrap(),
        vec![uid]
    );
    assert_eq!(
        indexer
            .get_sent_attestation_uids(store, ALICE, schema, 0, 10, false)
            .unwrap(),
        vec![uid]
    );
    assert_eq!(
        indexer
            .get_schema_attester_recipient_attestation_uids(store, schema, ALICE, BOB, 0, 10, false)
            .unwrap(),
        vec![uid]
    );
    assert_eq!(
        indexer.get_schema_attestation_uid_count(store, schema).unwrap(),
        1
    );
}

#[rstest]
fn test_indexing_twice_is_a_no_op(with_schema: (Ledger, B256)) {
    let (mut ledger, schema) = with_schema;
    let uid = attest(&mut ledger, ALICE, schema, request_data(BOB)).unwrap();

    let (indexer, store) = ledger.indexer_with_store();
    indexer.index_attestations(store, &[uid, uid]).unwrap();
    let events = store.events().len();
    indexer.index_attestation(store, uid).unwrap();

    assert_eq!(store.events().len(), events);
    assert_eq!(
        ledger
            .indexer()
            .get_received_attestation_uid_count(ledger.store(), BOB, schema)
            .unwrap(),
        1
    );
}

#[rstest]
fn test_unknown_uid_is_invalid(with_schema: (Ledger, B256)) {
    let (mut ledger, schema) = with_schema;
    let uid = attest(&mut ledger, ALICE, schema, request_data(BOB)).unwrap();

    let (indexer, store) = ledger.indexer_with_store();
    assert_eq!(
        indexer.index_attestations(store, &[uid, B256::repeat_byte(5)]),
        Err(EasError::InvalidAttestation)
    );
    // batch is all-or-nothing
    assert!(!indexer.is_attestation_indexed(store, &uid));
}

#[rstest]
fn test_sync_follows_the_outbox(with_schema: (Ledger, B256)) {
    let (mut ledger, schema) = with_schema;
    let first = attest_n(&mut ledger, schema, 3);

    let (indexer, store) = ledger.indexer_with_store();
    let cursor = indexer.sync(store, 0).unwrap();
    assert_eq!(cursor, store.events().len());
    assert!(first
        .iter()
        .all(|uid| indexer.is_attestation_indexed(&*store, uid)));

    let second = attest(&mut ledger, ALICE, schema, request_data(CAROL)).unwrap();
    let (indexer, store) = ledger.indexer_with_store();
    let next = indexer.sync(store, cursor).unwrap();
    assert!(next > cursor);
    assert!(indexer.is_attestation_indexed(store, &second));
    assert_eq!(indexer.sync(store, next + 1), Err(EasError::InvalidOffset));
}

#[rstest]
fn test_indexer_pagination(with_schema: (Ledger, B256)) {
    let (mut ledger, schema) = with_schema;
    let uids = attest_n(&mut ledger, schema, 10);
    let (indexer, store) = ledger.indexer_with_store();
    indexer.index_attestations(store, &uids).unwrap();

    let indexer = ledger.indexer();
    let store = ledger.store();
    assert_eq!(
        indexer
            .get_schema_attestation_uids(store, schema, 8, 5, false)
            .unwrap(),
        uids[8..].to_vec()
    );
    assert_eq!(
        indexer
            .get_schema_attestation_uids(store, schema, 8, 5, true)
            .unwrap(),
        vec![uids[1], uids[0]]
    );
    assert_eq!(
        indexer.get_schema_attestation_uids(store, schema, 10, 1, false),
        Err(EasError::InvalidOffset)
    );
    assert_eq!(
        indexer
            .get_received_attestation_uids(store, CAROL, schema, 0, 1, false)
            .unwrap(),
        Vec::<B256>::new()
    );
}
