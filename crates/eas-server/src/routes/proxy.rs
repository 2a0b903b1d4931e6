use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eas_core::CallContext;
use eas_primitives::alloy::primitives::B256;
use eas_primitives::api::{AttesterResponse, UidResponse, UidsResponse, WriteRequest};
use eas_primitives::{
    DelegatedAttestationRequest, DelegatedRevocationRequest, MultiDelegatedAttestationRequest,
    MultiDelegatedRevocationRequest,
};

use super::parse_param;
use crate::app_state::AppState;
use crate::error::Result;

pub async fn proxy_attest_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<DelegatedAttestationRequest>>,
) -> Result<(StatusCode, Json<UidResponse>)> {
    tracing::info!(attester = %body.request.attester, "proxied attestation submitted");
    let uid = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (proxy, store) = ledger.proxy_with_store();
            proxy.attest_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidResponse { uid })))
}

pub async fn proxy_multi_attest_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiDelegatedAttestationRequest>>>,
) -> Result<(StatusCode, Json<UidsResponse>)> {
    let uids = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (proxy, store) = ledger.proxy_with_store();
            proxy.multi_attest_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidsResponse { uids })))
}

pub async fn proxy_revoke_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<DelegatedRevocationRequest>>,
) -> Result<StatusCode> {
    tracing::info!(revoker = %body.request.revoker, "proxied revocation submitted");
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (proxy, store) = ledger.proxy_with_store();
            proxy.revoke_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn proxy_multi_revoke_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiDelegatedRevocationRequest>>>,
) -> Result<StatusCode> {
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (proxy, store) = ledger.proxy_with_store();
            proxy.multi_revoke_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Original signer of an attestation made through the proxy.
pub async fn get_attester_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<AttesterResponse>> {
    let uid: B256 = parse_param(&uid)?;
    let attester = state
        .read(|ledger, _| ledger.proxy().get_attester(ledger.store(), &uid))
        .await?;
    Ok(Json(AttesterResponse { attester }))
}
