use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use axum::{
    body::{to_bytes, Body, BodyDataStream, Bytes},
    http::{Request, Response, StatusCode},
    Router,
};
use eas_core::Ledger;
use eas_primitives::api::{DomainResponse, RegisterSchemaRequest, UidResponse, WriteRequest};
use eas_primitives::eip712::{attest_digest, revoke_digest, Eip712Domain};
use eas_primitives::{
    AttestationRequestData, DelegatedAttestationRequest, DelegatedRevocationRequest,
    RevocationRequestData, Signature,
};
use eas_server::{app_state::AppState, routes::router, subscription_manager::SubscriptionManager};
use futures_util::stream::{MapOk, TryStreamExt};
use serde::{de::DeserializeOwned, Serialize};
use tower::util::ServiceExt;

pub const MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MB limit

pub async fn setup_app(capacity: Option<usize>) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("eas_server=debug,eas_core=debug")
        .with_test_writer()
        .try_init();
    let subscription_manager = Arc::new(SubscriptionManager::new(capacity.unwrap_or(16)));
    let state = AppState::new(Ledger::default(), subscription_manager).await;
    router(state)
}

pub async fn post<B: Serialize>(app: &Router, uri: &str, body: &B) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = to_bytes(response.into_body(), MAX_BODY_SIZE).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn subscribe(
    app: &Router,
    query: &str,
) -> MapOk<BodyDataStream, impl FnMut(Bytes) -> String> {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/subscribe{query}"))
        .header("Accept", "text/event-stream")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .into_body()
        .into_data_stream()
        .map_ok(|bytes| String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn register_schema(app: &Router, schema: &str) -> B256 {
    let body = WriteRequest::new(
        Address::ZERO,
        RegisterSchemaRequest {
            schema: schema.to_string(),
            resolver: Address::ZERO,
            revocable: true,
        },
    );
    let response = post(app, "/schema/register", &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body::<UidResponse>(response).await.uid
}

pub async fn domains(app: &Router) -> DomainResponse {
    json_body(get(app, "/domain").await).await
}

pub fn sign(signer: &PrivateKeySigner, digest: &B256) -> Signature {
    Signature::from(signer.sign_hash_sync(digest).unwrap())
}

pub fn signed_attest(
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    schema: B256,
    data: AttestationRequestData,
    nonce: Option<U256>,
) -> DelegatedAttestationRequest {
    let digest = attest_digest(domain, signer.address(), schema, &data, nonce, 0);
    DelegatedAttestationRequest {
        schema,
        data,
        signature: sign(signer, &digest),
        attester: signer.address(),
        deadline: 0,
    }
}

pub fn signed_revoke(
    signer: &PrivateKeySigner,
    domain: &Eip712Domain,
    schema: B256,
    uid: B256,
    nonce: Option<U256>,
) -> DelegatedRevocationRequest {
    let data = RevocationRequestData {
        uid,
        value: U256::ZERO,
    };
    let digest = revoke_digest(domain, signer.address(), schema, &data, nonce, 0);
    DelegatedRevocationRequest {
        schema,
        data,
        signature: sign(signer, &digest),
        revoker: signer.address(),
        deadline: 0,
    }
}
