//! Error types for the Fuel Track client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 401 from the server; the stored token has been cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ClientError {
    /// Message suitable for an error notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(msg) | Self::Server { message: msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
