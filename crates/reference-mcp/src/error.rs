//! Error types.
//!
//! Provider errors never leave the fanout; they are logged and the provider
//! contributes nothing. Tool errors reach the client as JSON-RPC errors.

use std::time::Duration;

/// Fallback wait when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Why a single provider call produced no records.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// Connection, TLS or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered 429.
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider rejected the query (400), typically a bad filter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The request or body read exceeded the provider's timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The body was JSON but not the shape the provider documents.
    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The Atom feed was not well-formed XML.
    #[error("Malformed XML response: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl ProviderError {
    /// Rate limited, using the `Retry-After` seconds when present.
    #[must_use]
    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            retry_after: Duration::from_secs(retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Build the error for a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => Self::NotFound(body),
            400 => Self::BadRequest(body),
            500..=599 => Self::Server { status, message: body },
            _ => Self::UnexpectedStatus { status, message: body },
        }
    }

    /// Whether a later call could plausibly succeed.
    ///
    /// Fanout never retries; this only feeds log fields.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server { .. } | Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Wait suggested by a 429 response.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors returned by MCP tools.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    /// Arguments did not deserialize into the tool's input type, or output failed to encode.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Message placed in the JSON-RPC error.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::Serialization(e) => format!("Invalid arguments: {e}"),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

pub type ToolResult<T> = Result<T, ToolError>;
