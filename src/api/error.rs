use thiserror::Error;

/// Failure of a remote API call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server responded {status}: {}", describe(.message))]
    Status { status: u16, message: Option<String> },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

impl ApiError {
    /// The human-readable message the server attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}
