//! Discord webhook HTTP client with retry and rate limit handling
//!
//! Sends use `?wait=true` so Discord returns the created message, whose
//! id becomes the handle for later in-place edits.

use crate::error::DiscordError;
use crate::types::{WebhookMessage, WebhookReply};
use reqwest::{Client, Method, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Configuration for the webhook client
#[derive(Debug, Clone)]
pub struct WebhookClientConfig {
    /// Maximum number of attempts per delivery
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Log payloads instead of sending them
    pub dry_run: bool,
}

impl Default for WebhookClientConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
        }
    }
}

/// Discord webhook client
pub struct WebhookClient {
    client: Client,
    config: WebhookClientConfig,
    dry_run_counter: AtomicU64,
}

impl WebhookClient {
    pub fn new(config: WebhookClientConfig) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DiscordError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            dry_run_counter: AtomicU64::new(0),
        })
    }

    /// Validate a webhook URL before first use
    pub fn validate_url(webhook_url: &str) -> Result<(), DiscordError> {
        if !webhook_url.starts_with("https://discord.com/api/webhooks/")
            && !webhook_url.starts_with("https://discordapp.com/api/webhooks/")
        {
            return Err(DiscordError::InvalidWebhookUrl(
                "URL must start with https://discord.com/api/webhooks/".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Deliver a message, returning the created message id.
    pub async fn send(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<String, DiscordError> {
        if self.config.dry_run {
            let id = self.dry_run_counter.fetch_add(1, Ordering::SeqCst);
            let json = serde_json::to_string_pretty(message)?;
            info!("[DRY RUN] Would send webhook message:\n{}", json);
            return Ok(format!("dry-{}", id));
        }

        let url = format!("{}?wait=true", webhook_url);
        let reply = self.request_with_retry(Method::POST, &url, message).await?;
        reply.id.ok_or(DiscordError::MissingMessageId)
    }

    /// Edit a previously delivered message in place. A stale or deleted
    /// message id is swallowed as success.
    pub async fn edit(
        &self,
        webhook_url: &str,
        message_id: &str,
        message: &WebhookMessage,
    ) -> Result<(), DiscordError> {
        if self.config.dry_run {
            let json = serde_json::to_string_pretty(message)?;
            info!(message_id, "[DRY RUN] Would edit webhook message:\n{}", json);
            return Ok(());
        }

        let url = format!("{}/messages/{}", webhook_url, message_id);
        match self.request_with_retry(Method::PATCH, &url, message).await {
            Ok(_) => Ok(()),
            Err(DiscordError::WebhookError { status: 404, .. }) => {
                debug!(message_id, "Edit target no longer exists, ignoring");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Deliver with retry and rate limit handling.
    async fn request_with_retry(
        &self,
        method: Method,
        url: &str,
        message: &WebhookMessage,
    ) -> Result<WebhookReply, DiscordError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.request_once(method.clone(), url, message).await {
                Ok(reply) => {
                    if attempts > 1 {
                        info!(attempts, "Webhook delivery succeeded after retries");
                    }
                    return Ok(reply);
                }
                Err(e) => {
                    if let DiscordError::RateLimited { retry_after_ms } = &e {
                        if attempts < self.config.max_retries {
                            warn!(
                                retry_after_ms,
                                attempt = attempts,
                                "Rate limited by Discord, waiting before retry"
                            );
                            sleep(Duration::from_millis(*retry_after_ms)).await;
                            continue;
                        }
                    }

                    // Client errors other than 429 will not get better on
                    // retry; surface them immediately.
                    if let DiscordError::WebhookError { status, .. } = &e {
                        if (400u16..500u16).contains(status) && *status != 429 {
                            return Err(e);
                        }
                    }

                    if attempts >= self.config.max_retries {
                        error!(attempts, error = %e, "Webhook delivery failed after max retries");
                        return Err(DiscordError::RetryExhausted {
                            attempts,
                            message: e.to_string(),
                        });
                    }

                    warn!(attempt = attempts, error = %e, "Webhook delivery failed, retrying");
                    let delay = self.config.retry_delay_ms * 2u64.pow(attempts - 1);
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    async fn request_once(
        &self,
        method: Method,
        url: &str,
        message: &WebhookMessage,
    ) -> Result<WebhookReply, DiscordError> {
        let response = self
            .client
            .request(method, url)
            .json(message)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response(response: reqwest::Response) -> Result<WebhookReply, DiscordError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body: WebhookReply = response.json().await.unwrap_or(WebhookReply {
                id: None,
                code: None,
                message: Some("Rate limited".to_string()),
                retry_after: Some(5.0),
            });

            let retry_after_ms = body
                .retry_after
                .map(|secs| (secs * 1000.0) as u64)
                .unwrap_or(5000);

            return Err(DiscordError::RateLimited { retry_after_ms });
        }

        if status.is_success() {
            // 204 No Content for plain sends, a message object for
            // ?wait=true sends and edits.
            let reply = response.json().await.unwrap_or(WebhookReply {
                id: None,
                code: None,
                message: None,
                retry_after: None,
            });
            return Ok(reply);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DiscordError::WebhookError {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Embed;

    fn dry_client() -> WebhookClient {
        WebhookClient::new(WebhookClientConfig {
            dry_run: true,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_webhook_url() {
        let result = WebhookClient::validate_url("https://example.com/webhook");
        assert!(matches!(result, Err(DiscordError::InvalidWebhookUrl(_))));
    }

    #[test]
    fn test_valid_webhook_urls() {
        assert!(WebhookClient::validate_url("https://discord.com/api/webhooks/1/abc").is_ok());
        assert!(WebhookClient::validate_url("https://discordapp.com/api/webhooks/1/abc").is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_send_fabricates_ids() {
        let client = dry_client();
        let message = WebhookMessage::embed(Embed::new().title("test"));

        let first = client
            .send("https://discord.com/api/webhooks/1/abc", &message)
            .await
            .unwrap();
        let second = client
            .send("https://discord.com/api/webhooks/1/abc", &message)
            .await
            .unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_dry_run_edit_is_noop() {
        let client = dry_client();
        let message = WebhookMessage::embed(Embed::new().title("test"));

        let result = client
            .edit("https://discord.com/api/webhooks/1/abc", "dry-0", &message)
            .await;
        assert!(result.is_ok());
    }
}
