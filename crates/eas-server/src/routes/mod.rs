use std::str::FromStr;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::{Result, ServerError};

pub mod attest;
pub mod index;
pub mod misc;
pub mod proxy;
pub mod query;
pub mod revoke;
pub mod schema;
pub mod subscribe;

/// Full HTTP surface of the attestation service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/schema/register", post(schema::register_schema_handler))
        .route("/schema/:uid", get(schema::get_schema_handler))
        .route("/attest", post(attest::attest_handler))
        .route("/attest/multi", post(attest::multi_attest_handler))
        .route("/attest/delegated", post(attest::attest_by_delegation_handler))
        .route(
            "/attest/delegated/multi",
            post(attest::multi_attest_by_delegation_handler),
        )
        .route("/revoke", post(revoke::revoke_handler))
        .route("/revoke/multi", post(revoke::multi_revoke_handler))
        .route("/revoke/delegated", post(revoke::revoke_by_delegation_handler))
        .route(
            "/revoke/delegated/multi",
            post(revoke::multi_revoke_by_delegation_handler),
        )
        .route("/proxy/attest", post(proxy::proxy_attest_handler))
        .route("/proxy/attest/multi", post(proxy::proxy_multi_attest_handler))
        .route("/proxy/revoke", post(proxy::proxy_revoke_handler))
        .route("/proxy/revoke/multi", post(proxy::proxy_multi_revoke_handler))
        .route("/proxy/attester/:uid", get(proxy::get_attester_handler))
        .route("/timestamp", post(misc::timestamp_handler))
        .route("/timestamp/multi", post(misc::multi_timestamp_handler))
        .route("/timestamp/:data", get(misc::get_timestamp_handler))
        .route("/revoke-offchain", post(misc::revoke_offchain_handler))
        .route(
            "/revoke-offchain/multi",
            post(misc::multi_revoke_offchain_handler),
        )
        .route(
            "/revoke-offchain/:revoker/:data",
            get(misc::get_revoke_offchain_handler),
        )
        .route("/nonce/increase", post(misc::increase_nonce_handler))
        .route("/nonce/:account", get(query::get_nonce_handler))
        .route("/domain", get(query::get_domain_handler))
        .route("/attestation/:uid", get(query::get_attestation_handler))
        .route("/attestation/:uid/valid", get(query::is_attestation_valid_handler))
        .route("/index/batch", post(index::index_attestations_handler))
        .route("/index/:uid", post(index::index_attestation_handler))
        .route(
            "/index/received/:recipient/:schema",
            get(index::received_handler),
        )
        .route("/index/sent/:attester/:schema", get(index::sent_handler))
        .route("/index/schema/:schema", get(index::schema_handler))
        .route(
            "/index/schema/:schema/:attester/:recipient",
            get(index::schema_attester_recipient_handler),
        )
        .route("/subscribe", get(subscribe::subscribe_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .fallback(fallback)
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "404 Not Found" })))
}

/// Parse a hex path segment such as a UID or an address.
pub(crate) fn parse_param<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ServerError::InvalidPathParam(format!("{value}: {e}")))
}
