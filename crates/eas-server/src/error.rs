use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eas_primitives::api::ErrorResponse;
use eas_primitives::EasError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Eas(#[from] EasError),
    #[error("Subscribe: unknown event topics -> {0}")]
    UnknownTopics(String),
    #[error("Broadcast failed: {0}")]
    BroadcastError(String),
    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Eas(err) => match err {
                EasError::NotFound => StatusCode::NOT_FOUND,
                EasError::AccessDenied => StatusCode::FORBIDDEN,
                EasError::InvalidSignature
                | EasError::UsedSignature
                | EasError::DeadlineExpired => StatusCode::UNAUTHORIZED,
                EasError::AlreadyExists
                | EasError::AlreadyRevoked
                | EasError::AlreadyTimestamped
                | EasError::AlreadyRevokedOffchain => StatusCode::CONFLICT,
                EasError::NotPayable | EasError::InsufficientValue => StatusCode::PAYMENT_REQUIRED,
                EasError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ServerError::UnknownTopics(_) | ServerError::InvalidPathParam(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::BroadcastError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type Result<T> = core::result::Result<T, ServerError>;
