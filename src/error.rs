//! Error types for the studio workflows.

use std::time::Duration;

/// Maximum length of an API error message kept after sanitizing.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while encoding, generating, or extracting images.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A required input was missing; detected before any service call.
    #[error("{message}")]
    Validation {
        /// Name of the missing input (e.g. `"logo"`).
        field: &'static str,
        /// User-facing message.
        message: String,
    },

    /// Reading or decoding an uploaded file failed.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The service call succeeded but carried no usable image.
    #[error("No image data found in the API response.")]
    NoImageInResponse,

    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("{}", rate_limit_message(.retry_after))]
    RateLimited {
        /// Wait suggested by the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Any other rejection from the service, message passed through as-is.
    #[error("{0}")]
    Service(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input, no call was made.
    Validation,
    /// File read failure during encoding.
    Decode,
    /// The external call rejected or failed.
    Service,
    /// The call succeeded without an image.
    NoImage,
}

impl StudioError {
    /// Builds a validation error for a missing input.
    pub fn missing(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Maps this error onto the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Decode(_) => ErrorKind::Decode,
            Self::NoImageInResponse => ErrorKind::NoImage,
            Self::Auth(_)
            | Self::Api { .. }
            | Self::RateLimited { .. }
            | Self::ContentBlocked(_)
            | Self::Service(_)
            | Self::Network(_)
            | Self::Io(_) => ErrorKind::Service,
        }
    }

    /// Message shown to the user.
    ///
    /// Service rejections carry the service's own message without the
    /// variant prefix used by `Display`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message)
            | Self::Api { message, .. }
            | Self::ContentBlocked(message)
            | Self::Service(message) => message.clone(),
            Self::Network(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Name of the missing input, for validation errors.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

fn rate_limit_message(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!("Rate limited; try again in {} seconds.", wait.as_secs()),
        None => "Rate limited; try again later.".to_string(),
    }
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Reduces an API error body to a short, readable message.
///
/// Google APIs wrap failures as `{"error": {"message": ...}}`; that message
/// is preferred when present.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let extracted = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    let message = extracted.unwrap_or_else(|| text.trim().to_string());
    if message.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{}...", truncated)
    } else {
        message
    }
}

/// Parses a `Retry-After` header given in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}
