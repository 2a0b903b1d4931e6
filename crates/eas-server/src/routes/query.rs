use axum::{
    extract::{Path, State},
    Json,
};
use eas_primitives::alloy::primitives::{Address, B256};
use eas_primitives::api::{AttestationResponse, DomainResponse, NonceResponse, ValidResponse};

use super::parse_param;
use crate::app_state::AppState;
use crate::error::Result;

/// Attestation record with its status at the time of the query. Unknown UIDs
/// come back as the empty record with status `Unset`.
pub async fn get_attestation_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<AttestationResponse>> {
    let uid: B256 = parse_param(&uid)?;
    let response = state
        .read(|ledger, now| {
            let attestation = ledger.eas().get_attestation(ledger.store(), &uid)?;
            let status = attestation.status(now);
            Ok::<_, eas_primitives::EasError>(AttestationResponse {
                attestation,
                status,
            })
        })
        .await?;
    Ok(Json(response))
}

pub async fn is_attestation_valid_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<ValidResponse>> {
    let uid: B256 = parse_param(&uid)?;
    let valid = state
        .read(|ledger, _| ledger.eas().is_attestation_valid(ledger.store(), &uid))
        .await;
    Ok(Json(ValidResponse { valid }))
}

pub async fn get_nonce_handler(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<NonceResponse>> {
    let account: Address = parse_param(&account)?;
    let nonce = state
        .read(|ledger, _| ledger.eas().get_nonce(ledger.store(), account))
        .await?;
    Ok(Json(NonceResponse { nonce }))
}

/// Domains clients sign delegated requests against.
pub async fn get_domain_handler(State(state): State<AppState>) -> Json<DomainResponse> {
    let response = state
        .read(|ledger, _| DomainResponse {
            eas: ledger.eas().verifier().domain().clone(),
            proxy: ledger.proxy().verifier().domain().clone(),
        })
        .await;
    Json(response)
}
