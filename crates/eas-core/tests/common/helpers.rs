use alloy::primitives::{Address, B256, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use eas_core::{CallContext, Ledger};
use eas_primitives::eip712::{attest_digest, revoke_digest, Eip712Domain};
use eas_primitives::{
    AttestationRequest, AttestationRequestData, DelegatedAttestationRequest,
    DelegatedRevocationRequest, Result, RevocationRequest, RevocationRequestData, Signature,
};

use super::fixtures::ctx;

pub fn register(ledger: &mut Ledger, schema: &str, resolver: Address, revocable: bool) -> B256 {
    let registry = ledger.registry().clone();
    registry
        .register(ledger.store_mut(), &ctx(Address::ZERO), schema, resolver, revocable)
        .unwrap()
}

pub fn attest(
    ledger: &mut Ledger,
    sender: Address,
    schema: B256,
    data: AttestationRequestData,
) -> Result<B256> {
    attest_with(ledger, &ctx(sender), schema, data)
}

pub fn attest_with(
    ledger: &mut Ledger,
    ctx: &CallContext,
    schema: B256,
    data: AttestationRequestData,
) -> Result<B256> {
    let (eas, store) = ledger.eas_with_store();
    eas.attest(store, ctx, &AttestationRequest { schema, data })
}

pub fn revoke(ledger: &mut Ledger, sender: Address, schema: B256, uid: B256) -> Result<()> {
    let (eas, store) = ledger.eas_with_store();
    eas.revoke(
        store,
        &ctx(sender),
        &RevocationRequest {
            schema,
            data: RevocationRequestData {
                uid,
                value: U256::ZERO,
            },
        },
    )
}

pub fn sign(signer: &PrivateKeySigner, digest: &B256) -> Signature {
    Signature::from(signer.sign_hash_sync(digest).unwrap())
}

/// Signed attestation under `domain`; `nonce` must be `None` for the proxy.
pub fn signed_attest(
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    schema: B256,
    data: AttestationRequestData,
    nonce: Option<U256>,
    deadline: u64,
) -> DelegatedAttestationRequest {
    let digest = attest_digest(domain, signer.address(), schema, &data, nonce, deadline);
    DelegatedAttestationRequest {
        schema,
        data,
        signature: sign(signer, &digest),
        attester: signer.address(),
        deadline,
    }
}

pub fn signed_revoke(
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    schema: B256,
    uid: B256,
    nonce: Option<U256>,
    deadline: u64,
) -> DelegatedRevocationRequest {
    let data = RevocationRequestData {
        uid,
        value: U256::ZERO,
    };
    let digest = revoke_digest(domain, signer.address(), schema, &data, nonce, deadline);
    DelegatedRevocationRequest {
        schema,
        data,
        signature: sign(signer, &digest),
        revoker: signer.address(),
        deadline,
    }
}

pub fn eas_domain(ledger: &Ledger) -> Eip712Domain {
    ledger.eas().verifier().domain().clone()
}

pub fn proxy_domain(ledger: &Ledger) -> Eip712Domain {
    ledger.proxy().verifier().domain().clone()
}
