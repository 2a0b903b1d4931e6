use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use eas_primitives::alloy::primitives::{Address, B256};
use eas_primitives::api::{PageQuery, UidPage, UidsResponse};

use super::parse_param;
use crate::app_state::AppState;
use crate::error::Result;

pub async fn index_attestation_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<StatusCode> {
    let uid: B256 = parse_param(&uid)?;
    state
        .write(|ledger, _| {
            let (indexer, store) = ledger.indexer_with_store();
            indexer.index_attestation(store, uid)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn index_attestations_handler(
    State(state): State<AppState>,
    Json(body): Json<UidsResponse>,
) -> Result<StatusCode> {
    tracing::info!(count = body.uids.len(), "batch indexing submitted");
    state
        .write(|ledger, _| {
            let (indexer, store) = ledger.indexer_with_store();
            indexer.index_attestations(store, &body.uids)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn received_handler(
    State(state): State<AppState>,
    Path((recipient, schema)): Path<(String, String)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UidPage>> {
    let recipient: Address = parse_param(&recipient)?;
    let schema: B256 = parse_param(&schema)?;
    let page = state
        .read(|ledger, _| {
            let (indexer, store) = (ledger.indexer(), ledger.store());
            Ok::<_, eas_primitives::EasError>(UidPage {
                uids: indexer.get_received_attestation_uids(
                    store,
                    recipient,
                    schema,
                    page.start,
                    page.length,
                    page.reverse_order,
                )?,
                total: indexer.get_received_attestation_uid_count(store, recipient, schema)?,
            })
        })
        .await?;
    Ok(Json(page))
}

pub async fn sent_handler(
    State(state): State<AppState>,
    Path((attester, schema)): Path<(String, String)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UidPage>> {
    let attester: Address = parse_param(&attester)?;
    let schema: B256 = parse_param(&schema)?;
    let page = state
        .read(|ledger, _| {
            let (indexer, store) = (ledger.indexer(), ledger.store());
            Ok::<_, eas_primitives::EasError>(UidPage {
                uids: indexer.get_sent_attestation_uids(
                    store,
                    attester,
                    schema,
                    page.start,
                    page.length,
                    page.reverse_order,
                )?,
                total: indexer.get_sent_attestation_uid_count(store, attester, schema)?,
            })
        })
        .await?;
    Ok(Json(page))
}

pub async fn schema_handler(
    State(state): State<AppState>,
    Path(schema): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UidPage>> {
    let schema: B256 = parse_param(&schema)?;
    let page = state
        .read(|ledger, _| {
            let (indexer, store) = (ledger.indexer(), ledger.store());
            Ok::<_, eas_primitives::EasError>(UidPage {
                uids: indexer.get_schema_attestation_uids(
                    store,
                    schema,
                    page.start,
                    page.length,
                    page.reverse_order,
                )?,
                total: indexer.get_schema_attestation_uid_count(store, schema)?,
            })
        })
        .await?;
    Ok(Json(page))
}

pub async fn schema_attester_recipient_handler(
    State(state): State<AppState>,
    Path((schema, attester, recipient)): Path<(String, String, String)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UidPage>> {
    let schema: B256 = parse_param(&schema)?;
    let attester: Address = parse_param(&attester)?;
    let recipient: Address = parse_param(&recipient)?;
    let page = state
        .read(|ledger, _| {
            let (indexer, store) = (ledger.indexer(), ledger.store());
            Ok::<_, eas_primitives::EasError>(UidPage {
                uids: indexer.get_schema_attester_recipient_attestation_uids(
                    store,
                    schema,
                    attester,
                    recipient,
                    page.start,
                    page.length,
                    page.reverse_order,
                )?,
                total: indexer.get_schema_attester_recipient_attestation_uid_count(
                    store, schema, attester, recipient,
                )?,
            })
        })
        .await?;
    Ok(Json(page))
}
