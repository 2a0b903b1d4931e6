use axum::{extract::State, http::StatusCode, Json};
use eas_core::CallContext;
use eas_primitives::api::{UidResponse, UidsResponse, WriteRequest};
use eas_primitives::{
    AttestationRequest, DelegatedAttestationRequest, MultiAttestationRequest,
    MultiDelegatedAttestationRequest,
};

use crate::app_state::AppState;
use crate::error::Result;

pub async fn attest_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<AttestationRequest>>,
) -> Result<(StatusCode, Json<UidResponse>)> {
    tracing::info!(attester = %body.sender, schema = %body.request.schema, "attestation submitted");
    let uid = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.attest(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidResponse { uid })))
}

pub async fn multi_attest_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiAttestationRequest>>>,
) -> Result<(StatusCode, Json<UidsResponse>)> {
    tracing::info!(
        attester = %body.sender,
        groups = body.request.len(),
        "multi attestation submitted"
    );
    let uids = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_attest(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidsResponse { uids })))
}

pub async fn attest_by_delegation_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<DelegatedAttestationRequest>>,
) -> Result<(StatusCode, Json<UidResponse>)> {
    tracing::info!(
        attester = %body.request.attester,
        relayer = %body.sender,
        "delegated attestation submitted"
    );
    let uid = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.attest_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidResponse { uid })))
}

pub async fn multi_attest_by_delegation_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiDelegatedAttestationRequest>>>,
) -> Result<(StatusCode, Json<UidsResponse>)> {
    let uids = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_attest_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidsResponse { uids })))
}
