//! Discord webhook error types

use scorewatch_core::DeliveryError;
use thiserror::Error;

/// Discord webhook errors
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Request serialization failed: {0}")]
    SerializationError(String),

    #[error("Webhook reply missing message id")]
    MissingMessageId,

    #[error("Retry exhausted after {attempts} attempts: {message}")]
    RetryExhausted { attempts: u32, message: String },

    #[error("Webhook returned error: {status} - {message}")]
    WebhookError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for DiscordError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DiscordError::Timeout
        } else {
            DiscordError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DiscordError {
    fn from(err: serde_json::Error) -> Self {
        DiscordError::SerializationError(err.to_string())
    }
}

impl From<DiscordError> for DeliveryError {
    fn from(err: DiscordError) -> Self {
        match err {
            DiscordError::RateLimited { retry_after_ms } => {
                DeliveryError::RateLimited { retry_after_ms }
            }
            DiscordError::RetryExhausted { attempts, message } => {
                DeliveryError::RetryExhausted { attempts, message }
            }
            DiscordError::WebhookError { status, message } => {
                DeliveryError::Endpoint { status, message }
            }
            DiscordError::Timeout => DeliveryError::Timeout,
            DiscordError::SerializationError(msg) => DeliveryError::Serialization(msg),
            other => DeliveryError::Http(other.to_string()),
        }
    }
}
