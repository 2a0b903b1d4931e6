use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eas_core::CallContext;
use eas_primitives::alloy::primitives::B256;
use eas_primitives::api::{RegisterSchemaRequest, UidResponse, WriteRequest};
use eas_primitives::SchemaRecord;

use super::parse_param;
use crate::app_state::AppState;
use crate::error::Result;

pub async fn register_schema_handler(
    State(state): State<AppState>,
    Json(body): Json<WriteRequest<RegisterSchemaRequest>>,
) -> Result<(StatusCode, Json<UidResponse>)> {
    tracing::info!(registerer = %body.sender, "schema registration submitted");
    let request = body.request;
    let uid = state
        .write(|ledger, now| {
            let ctx = CallContext::new(body.sender, now).with_value(body.value);
            let (eas, store) = ledger.eas_with_store();
            eas.get_schema_registry().register(
                store,
                &ctx,
                &request.schema,
                request.resolver,
                request.revocable,
            )
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UidResponse { uid })))
}

/// Unknown UIDs answer with the empty record, like the registry itself.
pub async fn get_schema_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<SchemaRecord>> {
    let uid: B256 = parse_param(&uid)?;
    let record = state
        .read(|ledger, _| ledger.registry().get_schema(ledger.store(), &uid))
        .await?;
    Ok(Json(record))
}
