//! Client error types.

use oktactl_core::identity::{CommandError, ServiceError};
use oktactl_core::logs::LogQueryError;
use oktactl_core::org::OrgUrlError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Okta returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    OrgUrl(#[from] OrgUrlError),

    #[error(transparent)]
    LogQuery(#[from] LogQueryError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for ServiceError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ServerError { status, message } if status == 401 || status == 403 => {
                ServiceError::Unauthorized(message)
            }
            ClientError::ServerError { status, message } => ServiceError::Api { status, message },
            ClientError::Auth(message) => ServiceError::Unauthorized(message),
            ClientError::InvalidResponse(message) => ServiceError::InvalidResponse(message),
            ClientError::Json(e) => ServiceError::InvalidResponse(e.to_string()),
            ClientError::Command(CommandError::Service(e)) => e,
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

impl From<ServiceError> for ClientError {
    fn from(error: ServiceError) -> Self {
        ClientError::Command(CommandError::Service(error))
    }
}
