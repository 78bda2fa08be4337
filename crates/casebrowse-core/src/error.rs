//! Error types for casebrowse.

use thiserror::Error;

/// Result type alias using casebrowse's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for casebrowse operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation was abandoned because a newer request replaced it.
    #[error("Request cancelled")]
    Cancelled,

    /// The data source answered with a non-success status. `message` may be
    /// empty when the response carried no body.
    #[error("HTTP {status}{}", message_suffix(.message))]
    Http { status: u16, message: String },

    /// HTTP/network request failed before a status was received
    #[error("Request error: {0}")]
    Request(String),

    /// The request exceeded its configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

/// Coarse classification used by the orchestrator to decide how an error
/// is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Expected outcome of superseding a request. Never shown to the user.
    Cancellation,
    /// Non-success status, network failure or timeout. Shown once.
    Transport,
    /// Malformed payload from the data source.
    DataShape,
    /// Bug or misconfiguration on our side.
    Internal,
}

impl Error {
    /// Build an HTTP status error with a message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Cancelled => ErrorClass::Cancellation,
            Error::Http { .. } | Error::Request(_) | Error::Timeout(_) | Error::NotFound(_) => {
                ErrorClass::Transport
            }
            Error::Serialization(_) => ErrorClass::DataShape,
            Error::Config(_) | Error::InvalidInput(_) | Error::Internal(_) => ErrorClass::Internal,
        }
    }

    /// True when this error is the cancellation signal of a superseded request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// HTTP status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else if e.is_decode() {
            Error::Serialization(e.to_string())
        } else if let Some(status) = e.status() {
            Error::http(status.as_u16(), e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}
