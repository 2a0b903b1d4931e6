//! EIP-712 delegated-request verification with pluggable replay protection.

use std::fmt;

use alloy::primitives::{Address, B256, U256};
use eas_primitives::eip712::{
    attest_struct_hash, revoke_struct_hash, verify_signature, Eip712Domain, ATTEST_PROXY_TYPE_HASH,
    ATTEST_TYPE_HASH, REVOKE_PROXY_TYPE_HASH, REVOKE_TYPE_HASH,
};
use eas_primitives::utils::hash_typed_data;
use eas_primitives::{
    DelegatedAttestationRequest, DelegatedRevocationRequest, EasError, Event, Result,
};
use tracing::debug;

use crate::context::CallContext;
use crate::store::{tables, Store};

/// How a verifier stops a signed message from being used twice.
pub trait ReplayStrategy: fmt::Debug + Send + Sync {
    /// Whether signed messages carry a per-signer nonce.
    fn uses_nonces(&self) -> bool;

    /// Nonce to sign over for `signer`, consuming it. `None` when the strategy
    /// has no nonces.
    fn take_nonce(
        &self,
        store: &mut dyn Store,
        scope: Address,
        signer: Address,
    ) -> Result<Option<U256>>;

    /// Record that `digest` has been presented.
    fn spend(&self, store: &mut dyn Store, scope: Address, digest: &B256) -> Result<()>;
}

/// Per-signer counter included in every signed message, used by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceStrategy;

impl ReplayStrategy for NonceStrategy {
    fn uses_nonces(&self) -> bool {
        true
    }

    fn take_nonce(
        &self,
        store: &mut dyn Store,
        scope: Address,
        signer: Address,
    ) -> Result<Option<U256>> {
        let nonce = tables::nonce(store, scope, signer)?;
        // a wrapped counter would make every used nonce valid again
        let next = nonce
            .checked_add(U256::from(1))
            .ok_or(EasError::InvalidNonce)?;
        tables::set_nonce(store, scope, signer, next);
        Ok(Some(nonce))
    }

    fn spend(&self, _store: &mut dyn Store, _scope: Address, _digest: &B256) -> Result<()> {
        Ok(())
    }
}

/// Set of already-presented digests, used by the proxy.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsedSignatureStrategy;

impl ReplayStrategy for UsedSignatureStrategy {
    fn uses_nonces(&self) -> bool {
        false
    }

    fn take_nonce(
        &self,
        _store: &mut dyn Store,
        _scope: Address,
        _signer: Address,
    ) -> Result<Option<U256>> {
        Ok(None)
    }

    fn spend(&self, store: &mut dyn Store, scope: Address, digest: &B256) -> Result<()> {
        if tables::is_digest_used(store, scope, digest) {
            return Err(EasError::UsedSignature);
        }
        tables::mark_digest_used(store, scope, digest);
        Ok(())
    }
}

/// Verifies delegated attest and revoke requests signed under one domain.
#[derive(Debug, Clone)]
pub struct Eip712Verifier<R> {
    domain: Eip712Domain,
    separator: B256,
    strategy: R,
}

impl<R: ReplayStrategy> Eip712Verifier<R> {
    pub fn new(domain: Eip712Domain, strategy: R) -> Self {
        let separator = domain.separator();
        Self {
            domain,
            separator,
            strategy,
        }
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Address the verifier's replay state is scoped to.
    pub fn address(&self) -> Address {
        self.domain.verifying_contract
    }

    pub fn get_domain_separator(&self) -> B256 {
        self.separator
    }

    pub fn get_name(&self) -> &str {
        &self.domain.name
    }

    pub fn get_attest_type_hash(&self) -> B256 {
        if self.strategy.uses_nonces() {
            *ATTEST_TYPE_HASH
        } else {
            *ATTEST_PROXY_TYPE_HASH
        }
    }

    pub fn get_revoke_type_hash(&self) -> B256 {
        if self.strategy.uses_nonces() {
            *REVOKE_TYPE_HASH
        } else {
            *REVOKE_PROXY_TYPE_HASH
        }
    }

    pub fn get_nonce(&self, store: &dyn Store, account: Address) -> Result<U256> {
        tables::nonce(store, self.address(), account)
    }

    /// Raise the caller's nonce to `new_nonce`, invalidating every signature
    /// over a lower one.
    pub fn increase_nonce(
        &self,
        store: &mut dyn Store,
        ctx: &CallContext,
        new_nonce: U256,
    ) -> Result<()> {
        let old_nonce = self.get_nonce(store, ctx.sender)?;
        if new_nonce <= old_nonce {
            return Err(EasError::InvalidNonce);
        }
        tables::set_nonce(store, self.address(), ctx.sender, new_nonce);
        store.emit(Event::NonceIncreased {
            account: ctx.sender,
            old_nonce,
            new_nonce,
        });
        Ok(())
    }

    /// Check a delegated attestation and consume its replay token.
    ///
    /// Must run inside the caller's transaction so a later failure gives the
    /// token back.
    pub fn verify_attest(
        &self,
        store: &mut dyn Store,
        now: u64,
        request: &DelegatedAttestationRequest,
    ) -> Result<()> {
        check_deadline(request.deadline, now)?;

        let nonce = self.strategy.take_nonce(store, self.address(), request.attester)?;
        let struct_hash = attest_struct_hash(
            self.get_attest_type_hash(),
            request.attester,
            request.schema,
            &request.data,
            nonce,
            request.deadline,
        );
        let digest = hash_typed_data(self.separator, struct_hash);
        self.strategy.spend(store, self.address(), &digest)?;

        debug!(attester = %request.attester, %digest, "verifying delegated attestation");
        verify_signature(&digest, &request.signature, request.attester)
    }

    /// Check a delegated revocation and consume its replay token.
    pub fn verify_revoke(
        &self,
        store: &mut dyn Store,
        now: u64,
        request: &DelegatedRevocationRequest,
    ) -> Result<()> {
        check_deadline(request.deadline, now)?;

        let nonce = self.strategy.take_nonce(store, self.address(), request.revoker)?;
        let struct_hash = revoke_struct_hash(
            self.get_revoke_type_hash(),
            request.revoker,
            request.schema,
            &request.data,
            nonce,
            request.deadline,
        );
        let digest = hash_typed_data(self.separator, struct_hash);
        self.strategy.spend(store, self.address(), &digest)?;

        debug!(revoker = %request.revoker, %digest, "verifying delegated revocation");
        verify_signature(&digest, &request.signature, request.revoker)
    }
}

/// A zero deadline never expires.
fn check_deadline(deadline: u64, now: u64) -> Result<()> {
    if deadline != 0 && deadline < now {
        return Err(EasError::DeadlineExpired);
    }
    Ok(())
}
