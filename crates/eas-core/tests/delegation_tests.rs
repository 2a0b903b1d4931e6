use alloy::primitives::{B256, U256};
use alloy::signers::local::PrivateKeySigner;
use common::fixtures::*;
use common::helpers::*;
use eas_core::Ledger;
use eas_primitives::{
    EasError, Event, MultiDelegatedAttestationRequest, MultiDelegatedRevocationRequest,
};
use rstest::*;

mod common;

#[rstest]
fn test_attest_by_delegation(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let request = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);

    // anyone may relay a signed request
    let (eas, store) = ledger.eas_with_store();
    let uid = eas.attest_by_delegation(store, &ctx(CAROL), &request).unwrap();

    let attestation = ledger.eas().get_attestation(ledger.store(), &uid).unwrap();
    assert_eq!(attestation.attester, signer.address());
    assert_eq!(
        ledger.eas().get_nonce(ledger.store(), signer.address()).unwrap(),
        U256::from(1)
    );
}

#[rstest]
fn test_replayed_signature_fails(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let request = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);

    let (eas, store) = ledger.eas_with_store();
    eas.attest_by_delegation(store, &ctx(CAROL), &request).unwrap();
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &request),
        Err(EasError::InvalidSignature)
    );
    // the failed replay did not burn a nonce
    assert_eq!(
        ledger.eas().get_nonce(ledger.store(), signer.address()).unwrap(),
        U256::from(1)
    );
}

#[rstest]
fn test_failed_delegation_keeps_nonce(mut ledger: Ledger, signer: PrivateKeySigner) {
    let domain = eas_domain(&ledger);
    let unknown = B256::repeat_byte(0xee);
    let request = signed_attest(&signer, &domain, unknown, request_data(BOB), Some(U256::ZERO), 0);

    let (eas, store) = ledger.eas_with_store();
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &request),
        Err(EasError::InvalidSchema)
    );
    assert_eq!(
        ledger.eas().get_nonce(ledger.store(), signer.address()).unwrap(),
        U256::ZERO
    );
}

#[rstest]
#[case(NOW - 1, Err(EasError::DeadlineExpired))]
#[case(NOW, Ok(()))]
#[case(0, Ok(()))]
fn test_deadline(
    with_schema: (Ledger, B256),
    signer: PrivateKeySigner,
    #[case] deadline: u64,
    #[case] expected: Result<(), EasError>,
) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let request = signed_attest(
        &signer,
        &domain,
        schema,
        request_data(BOB),
        Some(U256::ZERO),
        deadline,
    );

    let (eas, store) = ledger.eas_with_store();
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &request).map(drop),
        expected
    );
}

#[rstest]
fn test_signature_from_other_key(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let mut request =
        signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);
    request.attester = ALICE;

    let (eas, store) = ledger.eas_with_store();
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &request),
        Err(EasError::InvalidSignature)
    );
}

#[rstest]
fn test_multi_attest_by_delegation(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let first = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);
    let second = signed_attest(
        &signer,
        &domain,
        schema,
        request_data(CAROL),
        Some(U256::from(1)),
        0,
    );

    let mut request = MultiDelegatedAttestationRequest {
        schema,
        data: vec![first.data, second.data],
        signatures: vec![first.signature],
        attester: signer.address(),
        deadline: 0,
    };

    let (eas, store) = ledger.eas_with_store();
    assert_eq!(
        eas.multi_attest_by_delegation(store, &ctx(CAROL), std::slice::from_ref(&request)),
        Err(EasError::InvalidLength)
    );

    request.signatures.push(second.signature);
    let uids = eas
        .multi_attest_by_delegation(store, &ctx(CAROL), &[request])
        .unwrap();
    assert_eq!(uids.len(), 2);
    assert_eq!(
        ledger.eas().get_nonce(ledger.store(), signer.address()).unwrap(),
        U256::from(2)
    );
}

#[rstest]
fn test_revoke_by_delegation(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let uid = attest(&mut ledger, signer.address(), schema, request_data(BOB)).unwrap();

    let request = signed_revoke(&signer, &domain, schema, uid, Some(U256::ZERO), 0);
    let (eas, store) = ledger.eas_with_store();
    eas.revoke_by_delegation(store, &ctx(CAROL), &request).unwrap();

    assert!(ledger
        .eas()
        .get_attestation(ledger.store(), &uid)
        .unwrap()
        .is_revoked());
    assert!(matches!(
        ledger.events().last(),
        Some(Event::Revoked { revoker, .. }) if *revoker == signer.address()
    ));
}

#[rstest]
fn test_multi_revoke_by_delegation(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let first = attest(&mut ledger, signer.address(), schema, request_data(BOB)).unwrap();
    let second = attest(&mut ledger, signer.address(), schema, request_data(CAROL)).unwrap();

    let a = signed_revoke(&signer, &domain, schema, first, Some(U256::ZERO), 0);
    let b = signed_revoke(&signer, &domain, schema, second, Some(U256::from(1)), 0);
    let request = MultiDelegatedRevocationRequest {
        schema,
        data: vec![a.data, b.data],
        signatures: vec![a.signature, b.signature],
        revoker: signer.address(),
        deadline: 0,
    };

    let (eas, store) = ledger.eas_with_store();
    eas.multi_revoke_by_delegation(store, &ctx(CAROL), &[request])
        .unwrap();
    for uid in [first, second] {
        assert!(ledger
            .eas()
            .get_attestation(ledger.store(), &uid)
            .unwrap()
            .is_revoked());
    }
}

#[rstest]
fn test_increase_nonce_invalidates_signatures(
    with_schema: (Ledger, B256),
    signer: PrivateKeySigner,
) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let pending = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);

    let (eas, store) = ledger.eas_with_store();
    eas.increase_nonce(store, &ctx(signer.address()), U256::from(10))
        .unwrap();
    assert_eq!(
        eas.increase_nonce(store, &ctx(signer.address()), U256::from(3)),
        Err(EasError::InvalidNonce)
    );
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &pending),
        Err(EasError::InvalidSignature)
    );

    let fresh = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::from(10)), 0);
    let (eas, store) = ledger.eas_with_store();
    eas.attest_by_delegation(store, &ctx(CAROL), &fresh).unwrap();
}

#[rstest]
fn test_exhausted_nonce_never_wraps(with_schema: (Ledger, B256), signer: PrivateKeySigner) {
    let (mut ledger, schema) = with_schema;
    let domain = eas_domain(&ledger);
    let used = signed_attest(&signer, &domain, schema, request_data(BOB), Some(U256::ZERO), 0);
    let last = signed_attest(&signer, &domain, schema, request_data(CAROL), Some(U256::MAX), 0);

    let (eas, store) = ledger.eas_with_store();
    eas.attest_by_delegation(store, &ctx(CAROL), &used).unwrap();
    eas.increase_nonce(store, &ctx(signer.address()), U256::MAX)
        .unwrap();

    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &last),
        Err(EasError::InvalidNonce)
    );
    // the counter is exhausted, so no signature from this account verifies again
    assert_eq!(
        eas.attest_by_delegation(store, &ctx(CAROL), &used),
        Err(EasError::InvalidNonce)
    );
    assert_eq!(
        ledger.eas().get_nonce(ledger.store(), signer.address()).unwrap(),
        U256::MAX
    );
}
