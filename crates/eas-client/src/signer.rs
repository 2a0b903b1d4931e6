use eas_primitives::alloy::primitives::{Address, B256, U256};
use eas_primitives::alloy::signers::Signer;
use eas_primitives::eip712::{attest_digest, revoke_digest, Eip712Domain};
use eas_primitives::{
    AttestationRequestData, DelegatedAttestationRequest, DelegatedRevocationRequest,
    MultiDelegatedAttestationRequest, MultiDelegatedRevocationRequest, RevocationRequestData,
    Signature,
};

use crate::error::{ClientError, Result};

/// Signs delegated attestation and revocation requests for one domain.
///
/// Requests for the engine carry the signer's current nonce, requests for the
/// proxy carry none. Multi requests consume one nonce per item, in order.
#[derive(Debug, Clone)]
pub struct DelegationSigner<S>
where
    S: Signer + Clone,
{
    signer: S,
    domain: Eip712Domain,
}

impl<S> DelegationSigner<S>
where
    S: Signer + Clone + Send + Sync,
{
    pub fn new(signer: S, domain: Eip712Domain) -> Self {
        Self { signer, domain }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    async fn sign(&self, digest: &B256) -> Result<Signature> {
        let signature = self
            .signer
            .sign_hash(digest)
            .await
            .map_err(|e| ClientError::SigningError(e.to_string()))?;
        Ok(Signature::from(signature))
    }

    pub async fn sign_attestation(
        &self,
        schema: B256,
        data: AttestationRequestData,
        nonce: Option<U256>,
        deadline: u64,
    ) -> Result<DelegatedAttestationRequest> {
        let attester = self.address();
        let digest = attest_digest(&self.domain, attester, schema, &data, nonce, deadline);
        Ok(DelegatedAttestationRequest {
            schema,
            data,
            signature: self.sign(&digest).await?,
            attester,
            deadline,
        })
    }

    pub async fn sign_multi_attestation(
        &self,
        schema: B256,
        data: Vec<AttestationRequestData>,
        first_nonce: Option<U256>,
        deadline: u64,
    ) -> Result<MultiDelegatedAttestationRequest> {
        let attester = self.address();
        let mut signatures = Vec::with_capacity(data.len());
        for (i, item) in data.iter().enumerate() {
            let nonce = first_nonce.map(|n| n + U256::from(i));
            let digest = attest_digest(&self.domain, attester, schema, item, nonce, deadline);
            signatures.push(self.sign(&digest).await?);
        }
        Ok(MultiDelegatedAttestationRequest {
            schema,
            data,
            signatures,
            attester,
            deadline,
        })
    }

    pub async fn sign_revocation(
        &self,
        schema: B256,
        data: RevocationRequestData,
        nonce: Option<U256>,
        deadline: u64,
    ) -> Result<DelegatedRevocationRequest> {
        let revoker = self.address();
        let digest = revoke_digest(&self.domain, revoker, schema, &data, nonce, deadline);
        Ok(DelegatedRevocationRequest {
            schema,
            data,
            signature: self.sign(&digest).await?,
            revoker,
            deadline,
        })
    }

    pub async fn sign_multi_revocation(
        &self,
        schema: B256,
        data: Vec<RevocationRequestData>,
        first_nonce: Option<U256>,
        deadline: u64,
    ) -> Result<MultiDelegatedRevocationRequest> {
        let revoker = self.address();
        let mut signatures = Vec::with_capacity(data.len());
        for (i, item) in data.iter().enumerate() {
            let nonce = first_nonce.map(|n| n + U256::from(i));
            let digest = revoke_digest(&self.domain, revoker, schema, item, nonce, deadline);
            signatures.push(self.sign(&digest).await?);
        }
        Ok(MultiDelegatedRevocationRequest {
            schema,
            data,
            signatures,
            revoker,
            deadline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eas_primitives::alloy::primitives::{address, Bytes};
    use eas_primitives::alloy::signers::PrivateKeySigner;
    use eas_primitives::eip712::recover_signer;

    fn domain() -> Eip712Domain {
        Eip712Domain::new(
            "EAS",
            "1.3.0",
            31337,
            address!("0000000000000000000000000000000000000021"),
        )
    }

    fn data() -> AttestationRequestData {
        AttestationRequestData {
            recipient: address!("0000000000000000000000000000000000000b0b"),
            data: Bytes::from_static(b"hello"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn attestation_signature_recovers_signer() {
        let signer = DelegationSigner::new(PrivateKeySigner::random(), domain());
        let schema = B256::repeat_byte(1);
        let request = signer
            .sign_attestation(schema, data(), Some(U256::ZERO), 0)
            .await
            .unwrap();

        let digest = attest_digest(
            signer.domain(),
            signer.address(),
            schema,
            &request.data,
            Some(U256::ZERO),
            0,
        );
        assert_eq!(
            recover_signer(&digest, &request.signature).unwrap(),
            signer.address()
        );
        assert_eq!(request.attester, signer.address());
    }

    #[tokio::test]
    async fn multi_signatures_use_consecutive_nonces() {
        let signer = DelegationSigner::new(PrivateKeySigner::random(), domain());
        let schema = B256::repeat_byte(2);
        let items = vec![
            RevocationRequestData {
                uid: B256::repeat_byte(3),
                value: U256::ZERO,
            },
            RevocationRequestData {
                uid: B256::repeat_byte(4),
                value: U256::ZERO,
            },
        ];
        let request = signer
            .sign_multi_revocation(schema, items, Some(U256::from(7)), 0)
            .await
            .unwrap();

        let second = revoke_digest(
            signer.domain(),
            signer.address(),
            schema,
            &request.data[1],
            Some(U256::from(8)),
            0,
        );
        assert_eq!(
            recover_signer(&second, &request.signatures[1]).unwrap(),
            signer.address()
        );
    }
}
