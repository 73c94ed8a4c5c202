use thiserror::Error;

/// Alert delivery errors
///
/// Delivery is best-effort: these are logged and discarded by every
/// caller, never allowed to block a state transition.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Request serialization failed: {0}")]
    Serialization(String),

    #[error("Retry exhausted after {attempts} attempts: {message}")]
    RetryExhausted { attempts: u32, message: String },

    #[error("Delivery endpoint returned error: {status} - {message}")]
    Endpoint { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,
}

/// Health poll errors
///
/// Raised only when the check fails before a status code is obtained; a
/// non-200 response is a poll *result*, not a poll error.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timeout")]
    Timeout,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
