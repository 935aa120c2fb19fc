//! Error handling for the IMS client
//!
//! Every failure is terminal at the UI boundary: it is surfaced as a toast
//! and returned to the caller. Only read queries are retried, and never on
//! 401/403.

use reqwest::StatusCode;
use shared::models::TransitionError;
use shared::validation::{summarize, ValidationFailure};
use thiserror::Error;

use crate::notify::Notification;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Raised before any request is sent
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationFailure>),

    #[error("Action not available: {0}")]
    Transition(#[from] TransitionError),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Cancelled")]
    Cancelled,

    // Server responses
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    // Transport
    #[error("Unable to connect to the server: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    // Local
    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Body of an error response
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ClientError {
    /// Map a non-success HTTP status and its (optional) message
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized {
                message: message
                    .unwrap_or_else(|| "Your session has expired. Please log in again.".into()),
            },
            StatusCode::FORBIDDEN => ClientError::Forbidden {
                message: message.unwrap_or_else(|| {
                    "You do not have permission to access this resource.".into()
                }),
            },
            StatusCode::NOT_FOUND => ClientError::NotFound {
                message: message.unwrap_or_else(|| "An error occurred.".into()),
            },
            other => ClientError::Server {
                status: other.as_u16(),
                message: message.unwrap_or_else(|| "An error occurred.".into()),
            },
        }
    }

    /// HTTP status carried by the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized { .. } | ClientError::Forbidden { .. }
        )
    }

    /// Toast describing this error
    pub fn notification(&self) -> Notification {
        match self {
            ClientError::Validation(failures) => {
                Notification::error("Validation", summarize(failures))
            }
            ClientError::Transition(err) => Notification::error("Not allowed", err.to_string()),
            ClientError::NotAuthenticated => {
                Notification::error("Unauthorized", "Please log in to continue.").auto_close(3000)
            }
            ClientError::Cancelled => Notification::info("Cancelled", "No changes were made."),
            ClientError::Unauthorized { message } => {
                Notification::error("Unauthorized", message.clone()).auto_close(3000)
            }
            ClientError::Forbidden { message } => {
                Notification::error("Forbidden", message.clone()).auto_close(3000)
            }
            ClientError::NotFound { message } | ClientError::Server { message, .. } => {
                Notification::error("Error", message.clone()).auto_close(5000)
            }
            ClientError::Network(_) => {
                Notification::error("Network Error", "Unable to connect to the server.")
                    .auto_close(5000)
            }
            ClientError::Decode(_) => {
                Notification::error("Error", "Unexpected response from the server.")
                    .auto_close(5000)
            }
            ClientError::Session(msg) => Notification::error("Session", msg.clone()),
            ClientError::Config(err) => Notification::error("Configuration", err.to_string()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
