use axum::{extract::State, http::StatusCode};
use axum::Json;
use eas_core::CallContext;
use eas_primitives::api::WriteRequest;
use eas_primitives::{
    DelegatedRevocationRequest, MultiDelegatedRevocationRequest, MultiRevocationRequest,
    RevocationRequest,
};

use crate::app_state::AppState;
use crate::error::Result;

pub async fn revoke_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<RevocationRequest>>,
) -> Result<StatusCode> {
    tracing::info!(revoker = %body.sender, uid = %body.request.data.uid, "revocation submitted");
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.revoke(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn multi_revoke_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiRevocationRequest>>>,
) -> Result<StatusCode> {
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_revoke(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_by_delegation_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<DelegatedRevocationRequest>>,
) -> Result<StatusCode> {
    tracing::info!(
        revoker = %body.request.revoker,
        relayer = %body.sender,
        "delegated revocation submitted"
    );
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.revoke_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn multi_revoke_by_delegation_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<MultiDelegatedRevocationRequest>>>,
) -> Result<StatusCode> {
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_revoke_by_delegation(store, &ctx, &body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
