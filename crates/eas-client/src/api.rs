use eas_primitives::alloy::primitives::{Address, B256, U256};
use eas_primitives::api::{
    AttestationResponse, AttesterResponse, DomainResponse, ErrorResponse, NonceResponse,
    PageQuery, RegisterSchemaRequest, TimestampResponse, UidPage, UidResponse, UidsResponse,
    ValidResponse, WriteRequest,
};
use eas_primitives::{
    AttestationRequest, DelegatedAttestationRequest, DelegatedRevocationRequest,
    MultiAttestationRequest, MultiDelegatedAttestationRequest, MultiDelegatedRevocationRequest,
    MultiRevocationRequest, RevocationRequest, SchemaRecord,
};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{ClientError, Result};
use crate::stream::{event_stream, EventStream};

/// Typed client for the attestation service HTTP API.
#[derive(Debug, Clone)]
pub struct EasApiClient {
    client: Client,
    server_url: Url,
}

impl EasApiClient {
    pub fn new(server_url: Url) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::BuilderError(e.to_string()))?;
        Ok(Self { client, server_url })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.server_url
            .join(path)
            .map_err(|e| ClientError::ServerUrlParsingError(e.to_string()))
    }

    /// Pass successful responses through, turn the rest into `ServerResponseError`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "server rejected request");
        Err(ClientError::ServerResponseError {
            status: status.as_u16(),
            message,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::ServerRequestError(e.to_string()))?;
        Self::check(response).await
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
        response
            .json()
            .await
            .map_err(|e| ClientError::ServerRequestError(e.to_string()))
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self.send(self.client.post(self.url(path)?).json(body)).await?;
        Self::decode(response).await
    }

    /// POST to an endpoint answering with an empty body.
    async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.client.post(self.url(path)?).json(body)).await?;
        Ok(())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.send(self.client.get(self.url(path)?)).await?;
        Self::decode(response).await
    }

    async fn get_page(&self, path: &str, page: &PageQuery) -> Result<UidPage> {
        let request = self.client.get(self.url(path)?).query(&[
            ("start", page.start.to_string()),
            ("length", page.length.to_string()),
            ("reverseOrder", page.reverse_order.to_string()),
        ]);
        Self::decode(self.send(request).await?).await
    }

    pub async fn register_schema(
        &self,
        sender: Address,
        schema: &str,
        resolver: Address,
        revocable: bool,
    ) -> Result<B256> {
        let body = WriteRequest::new(
            sender,
            RegisterSchemaRequest {
                schema: schema.to_string(),
                resolver,
                revocable,
            },
        );
        let response: UidResponse = self.post("/schema/register", &body).await?;
        Ok(response.uid)
    }

    pub async fn get_schema(&self, uid: B256) -> Result<SchemaRecord> {
        self.get(&format!("/schema/{uid}")).await
    }

    pub async fn attest(&self, body: &WriteRequest<AttestationRequest>) -> Result<B256> {
        let response: UidResponse = self.post("/attest", body).await?;
        Ok(response.uid)
    }

    pub async fn multi_attest(
        &self,
        body: &WriteRequest<Vec<MultiAttestationRequest>>,
    ) -> Result<Vec<B256>> {
        let response: UidsResponse = self.post("/attest/multi", body).await?;
        Ok(response.uids)
    }

    pub async fn attest_by_delegation(
        &self,
        body: &WriteRequest<DelegatedAttestationRequest>,
    ) -> Result<B256> {
        let response: UidResponse = self.post("/attest/delegated", body).await?;
        Ok(response.uid)
    }

    pub async fn multi_attest_by_delegation(
        &self,
        body: &WriteRequest<Vec<MultiDelegatedAttestationRequest>>,
    ) -> Result<Vec<B256>> {
        let response: UidsResponse = self.post("/attest/delegated/multi", body).await?;
        Ok(response.uids)
    }

    pub async fn revoke(&self, body: &WriteRequest<RevocationRequest>) -> Result<()> {
        self.post_empty("/revoke", body).await
    }

    pub async fn multi_revoke(
        &self,
        body: &WriteRequest<Vec<MultiRevocationRequest>>,
    ) -> Result<()> {
        self.post_empty("/revoke/multi", body).await
    }

    pub async fn revoke_by_delegation(
        &self,
        body: &WriteRequest<DelegatedRevocationRequest>,
    ) -> Result<()> {
        self.post_empty("/revoke/delegated", body).await
    }

    pub async fn multi_revoke_by_delegation(
        &self,
        body: &WriteRequest<Vec<MultiDelegatedRevocationRequest>>,
    ) -> Result<()> {
        self.post_empty("/revoke/delegated/multi", body).await
    }

    pub async fn proxy_attest(
        &self,
        body: &WriteRequest<DelegatedAttestationRequest>,
    ) -> Result<B256> {
        let response: UidResponse = self.post("/proxy/attest", body).await?;
        Ok(response.uid)
    }

    pub async fn proxy_multi_attest(
        &self,
        body: &WriteRequest<Vec<MultiDelegatedAttestationRequest>>,
    ) -> Result<Vec<B256>> {
        let response: UidsResponse = self.post("/proxy/attest/multi", body).await?;
        Ok(response.uids)
    }

    pub async fn proxy_revoke(
        &self,
        body: &WriteRequest<DelegatedRevocationRequest>,
    ) -> Result<()> {
        self.post_empty("/proxy/revoke", body).await
    }

    pub async fn proxy_multi_revoke(
        &self,
        body: &WriteRequest<Vec<MultiDelegatedRevocationRequest>>,
    ) -> Result<()> {
        self.post_empty("/proxy/revoke/multi", body).await
    }

    pub async fn get_proxy_attester(&self, uid: B256) -> Result<Address> {
        let response: AttesterResponse = self.get(&format!("/proxy/attester/{uid}")).await?;
        Ok(response.attester)
    }

    pub async fn timestamp(&self, sender: Address, data: B256) -> Result<u64> {
        let response: TimestampResponse = self
            .post("/timestamp", &WriteRequest::new(sender, data))
            .await?;
        Ok(response.timestamp)
    }

    pub async fn multi_timestamp(&self, sender: Address, data: Vec<B256>) -> Result<u64> {
        let response: TimestampResponse = self
            .post("/timestamp/multi", &WriteRequest::new(sender, data))
            .await?;
        Ok(response.timestamp)
    }

    pub async fn get_timestamp(&self, data: B256) -> Result<u64> {
        let response: TimestampResponse = self.get(&format!("/timestamp/{data}")).await?;
        Ok(response.timestamp)
    }

    pub async fn revoke_offchain(&self, sender: Address, data: B256) -> Result<u64> {
        let response: TimestampResponse = self
            .post("/revoke-offchain", &WriteRequest::new(sender, data))
            .await?;
        Ok(response.timestamp)
    }

    pub async fn multi_revoke_offchain(&self, sender: Address, data: Vec<B256>) -> Result<u64> {
        let response: TimestampResponse = self
            .post("/revoke-offchain/multi", &WriteRequest::new(sender, data))
            .await?;
        Ok(response.timestamp)
    }

    pub async fn get_revoke_offchain(&self, revoker: Address, data: B256) -> Result<u64> {
        let response: TimestampResponse = self
            .get(&format!("/revoke-offchain/{revoker}/{data}"))
            .await?;
        Ok(response.timestamp)
    }

    pub async fn increase_nonce(&self, sender: Address, new_nonce: U256) -> Result<()> {
        self.post_empty("/nonce/increase", &WriteRequest::new(sender, new_nonce))
            .await
    }

    pub async fn get_nonce(&self, account: Address) -> Result<U256> {
        let response: NonceResponse = self.get(&format!("/nonce/{account}")).await?;
        Ok(response.nonce)
    }

    pub async fn get_domain(&self) -> Result<DomainResponse> {
        self.get("/domain").await
    }

    pub async fn get_attestation(&self, uid: B256) -> Result<AttestationResponse> {
        self.get(&format!("/attestation/{uid}")).await
    }

    pub async fn is_attestation_valid(&self, uid: B256) -> Result<bool> {
        let response: ValidResponse = self.get(&format!("/attestation/{uid}/valid")).await?;
        Ok(response.valid)
    }

    pub async fn index_attestation(&self, uid: B256) -> Result<()> {
        self.post_empty(&format!("/index/{uid}"), &()).await
    }

    pub async fn index_attestations(&self, uids: Vec<B256>) -> Result<()> {
        self.post_empty("/index/batch", &UidsResponse { uids }).await
    }

    pub async fn get_received_attestation_uids(
        &self,
        recipient: Address,
        schema: B256,
        page: &PageQuery,
    ) -> Result<UidPage> {
        self.get_page(&format!("/index/received/{recipient}/{schema}"), page)
            .await
    }

    pub async fn get_sent_attestation_uids(
        &self,
        attester: Address,
        schema: B256,
        page: &PageQuery,
    ) -> Result<UidPage> {
        self.get_page(&format!("/index/sent/{attester}/{schema}"), page)
            .await
    }

    pub async fn get_schema_attestation_uids(
        &self,
        schema: B256,
        page: &PageQuery,
    ) -> Result<UidPage> {
        self.get_page(&format!("/index/schema/{schema}"), page).await
    }

    pub async fn get_schema_attester_recipient_attestation_uids(
        &self,
        schema: B256,
        attester: Address,
        recipient: Address,
        page: &PageQuery,
    ) -> Result<UidPage> {
        self.get_page(
            &format!("/index/schema/{schema}/{attester}/{recipient}"),
            page,
        )
        .await
    }

    /// Subscribe to committed events, optionally restricted to the named ones.
    pub async fn subscribe(&self, events: &[&str]) -> Result<EventStream> {
        let mut url = self
            .url("/subscribe")
            .map_err(|e| ClientError::ServerSubscriptionError(e.to_string()))?;
        if !events.is_empty() {
            url.query_pairs_mut().append_pair("events", &events.join(","));
        }

        tracing::info!("Subscribing to server events: {url}");
        let response = self
            .client
            .get(url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| ClientError::ServerSubscriptionError(e.to_string()))?;
        let response = Self::check(response).await?;
        Ok(event_stream(response))
    }
}
