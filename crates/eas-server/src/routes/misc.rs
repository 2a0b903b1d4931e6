use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eas_core::CallContext;
use eas_primitives::alloy::primitives::{Address, B256, U256};
use eas_primitives::api::{TimestampResponse, WriteRequest};

use super::parse_param;
use crate::app_state::AppState;
use crate::error::Result;

pub async fn timestamp_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<B256>>,
) -> Result<Json<TimestampResponse>> {
    let timestamp = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now);
            let (eas, store) = ledger.eas_with_store();
            eas.timestamp(store, &ctx, body.request)
        })
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn multi_timestamp_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<B256>>>,
) -> Result<Json<TimestampResponse>> {
    let timestamp = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_timestamp(store, &ctx, &body.request)
        })
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn get_timestamp_handler(
    State(state): State<AppState>,
    Path(data): Path<String>,
) -> Result<Json<TimestampResponse>> {
    let data: B256 = parse_param(&data)?;
    let timestamp = state
        .read(|ledger, _| ledger.eas().get_timestamp(ledger.store(), &data))
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn revoke_offchain_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<B256>>,
) -> Result<Json<TimestampResponse>> {
    let timestamp = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now);
            let (eas, store) = ledger.eas_with_store();
            eas.revoke_offchain(store, &ctx, body.request)
        })
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn multi_revoke_offchain_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<Vec<B256>>>,
) -> Result<Json<TimestampResponse>> {
    let timestamp = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now);
            let (eas, store) = ledger.eas_with_store();
            eas.multi_revoke_offchain(store, &ctx, &body.request)
        })
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn get_revoke_offchain_handler(
    State(state): State<AppState>,
    Path((revoker, data)): Path<(String, String)>,
) -> Result<Json<TimestampResponse>> {
    let revoker: Address = parse_param(&revoker)?;
    let data: B256 = parse_param(&data)?;
    let timestamp = state
        .read(|ledger, _| ledger.eas().get_revoke_offchain(ledger.store(), revoker, &data))
        .await?;
    Ok(Json(TimestampResponse { timestamp }))
}

pub async fn increase_nonce_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<U256>>,
) -> Result<StatusCode> {
    tracing::info!(account = %body.sender, new_nonce = %body.request, "nonce increase submitted");
    state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now);
            let (eas, store) = ledger.eas_with_store();
            eas.increase_nonce(store, &ctx, body.request)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
