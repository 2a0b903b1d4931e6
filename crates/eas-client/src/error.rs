use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to parse server url: {0}")]
    ServerUrlParsingError(String),
    #[error("Failed server request: {0}")]
    ServerRequestError(String),
    #[error("Server rejected request ({status}): {message}")]
    ServerResponseError { status: u16, message: String },
    #[error("Failed to subscribe to server: {0}")]
    ServerSubscriptionError(String),
    #[error("Failed to parse server event: {0}")]
    EventParsingError(String),
    #[error("Failed request signing: {0}")]
    SigningError(String),
    #[error("Client builder error: {0}")]
    BuilderError(String),
}

pub type Result<T> = core::result::Result<T, ClientError>;
