//! Delegated entry point with its own signing domain and used-signature
//! replay protection.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use eas_primitives::eip712::Eip712Domain;
use eas_primitives::utils::EIP712_PROXY_VERSION;
use eas_primitives::{
    AttestationRequest, DelegatedAttestationRequest, DelegatedRevocationRequest, EasError,
    MultiAttestationRequest, MultiDelegatedAttestationRequest, MultiDelegatedRevocationRequest,
    MultiRevocationRequest, Result, RevocationRequest,
};
use tracing::info;

use crate::context::CallContext;
use crate::eas::Eas;
use crate::store::{atomically, tables, Store};
use crate::verifier::{Eip712Verifier, UsedSignatureStrategy};

/// Relays signed requests to the engine under its own address and remembers
/// who really signed each attestation.
#[derive(Debug)]
pub struct Eip712Proxy {
    address: Address,
    eas: Arc<Eas>,
    verifier: Eip712Verifier<UsedSignatureStrategy>,
}

impl Eip712Proxy {
    pub fn new(address: Address, name: &str, chain_id: u64, eas: Arc<Eas>) -> Self {
        let domain = Eip712Domain::new(name, EIP712_PROXY_VERSION, chain_id, address);
        Self {
            address,
            eas,
            verifier: Eip712Verifier::new(domain, UsedSignatureStrategy),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn version(&self) -> &'static str {
        EIP712_PROXY_VERSION
    }

    pub fn get_eas(&self) -> &Arc<Eas> {
        &self.eas
    }

    pub fn verifier(&self) -> &Eip712Verifier<UsedSignatureStrategy> {
        &self.verifier
    }

    pub fn get_domain_separator(&self) -> B256 {
        self.verifier.get_domain_separator()
    }

    /// Original signer of an attestation made through this proxy, zero if none.
    pub fn get_attester(&self, store: &dyn Store, uid: &B256) -> Result<Address> {
        tables::proxy_attester(store, self.address, uid)
    }

    pub fn attest_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &DelegatedAttestationRequest,
    ) -> Result<B256> {
        atomically(store, |store| {
            self.verifier.verify_attest(store, ctx.timestamp, request)?;
            let uid = self.eas.attest(
                store,
                &ctx.forwarded_by(self.address),
                &AttestationRequest {
                    schema: request.schema,
                    data: request.data.clone(),
                },
            )?;
            tables::set_proxy_attester(store, self.address, &uid, request.attester);
            info!(%uid, attester = %request.attester, "attested through proxy");
            Ok(uid)
        })
    }

    pub fn multi_attest_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiDelegatedAttestationRequest],
    ) -> Result<Vec<B256>> {
        atomically(store, |store| {
            let mut groups = Vec::with_capacity(requests.len());
            for request in requests {
                if request.data.is_empty() || request.data.len() != request.signatures.len() {
                    return Err(EasError::InvalidLength);
                }
                for (data, signature) in request.data.iter().zip(&request.signatures) {
                    self.verifier.verify_attest(
                        store,
                        ctx.timestamp,
                        &DelegatedAttestationRequest {
                            schema: request.schema,
                            data: data.clone(),
                            signature: signature.clone(),
                            attester: request.attester,
                            deadline: request.deadline,
                        },
                    )?;
                }
                groups.push(MultiAttestationRequest {
                    schema: request.schema,
                    data: request.data.clone(),
                });
            }

            let uids = self
                .eas
                .multi_attest(store, &ctx.forwarded_by(self.address), &groups)?;

            let attesters = requests
                .iter()
                .flat_map(|request| std::iter::repeat(request.attester).take(request.data.len()));
            for (uid, attester) in uids.iter().zip(attesters) {
                tables::set_proxy_attester(store, self.address, uid, attester);
            }
            Ok(uids)
        })
    }

    pub fn revoke_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        request: &DelegatedRevocationRequest,
    ) -> Result<()> {
        atomically(store, |store| {
            self.verifier.verify_revoke(store, ctx.timestamp, request)?;
            self.check_attester(store, &request.data.uid, request.revoker)?;
            self.eas.revoke(
                store,
                &ctx.forwarded_by(self.address),
                &RevocationRequest {
                    schema: request.schema,
                    data: request.data.clone(),
                },
            )
        })
    }

    pub fn multi_revoke_by_delegation(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        requests: &[MultiDelegatedRevocationRequest],
    ) -> Result<()> {
        atomically(store, |store| {
            let mut groups = Vec::with_capacity(requests.len());
            for request in requests {
                if request.data.is_empty() || request.data.len() != request.signatures.len() {
                    return Err(EasError::InvalidLength);
                }
                for (data, signature) in request.data.iter().zip(&request.signatures) {
                    self.verifier.verify_revoke(
                        store,
                        ctx.timestamp,
                        &DelegatedRevocationRequest {
                            schema: request.schema,
                            data: data.clone(),
                            signature: signature.clone(),
                            revoker: request.revoker,
                            deadline: request.deadline,
                        },
                    )?;
                    self.check_attester(store, &data.uid, request.revoker)?;
                }
                groups.push(MultiRevocationRequest {
                    schema: request.schema,
                    data: request.data.clone(),
                });
            }

            self.eas
                .multi_revoke(store, &ctx.forwarded_by(self.address), &groups)
        })
    }

    fn check_attester(&self, store: &dyn Store, uid: &B256, revoker: Address) -> Result<()> {
        let attester = self.get_attester(store, uid)?;
        if attester.is_zero() {
            return Err(EasError::NotFound);
        }
        if attester != revoker {
            return Err(EasError::AccessDenied);
        }
        Ok(())
    }
}
