//! Collaborator interfaces
//!
//! The supervisor core talks to the outside world through these seams:
//! alert delivery, settings lookup, and presence text. Implementations
//! live elsewhere (the Discord crate, the binary); the monitor logic only
//! ever sees the traits so every state machine is testable with doubles.

use crate::error::DeliveryError;
use async_trait::async_trait;

/// Opaque reference to a delivered notice (platform message id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeHandle(pub String);

/// Visual class of a notice; color/icon semantics are resolved by the
/// delivery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    /// Green - recovery and "up" notices
    Success,
    /// Blue - neutral status updates
    Info,
    /// Amber - degraded but self-healing conditions
    Warning,
    /// Red - outages and abnormal terminations
    Error,
}

/// A status notice to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: Option<String>,
    pub footer: Option<String>,
    pub style: NoticeStyle,
    /// Raw mention string (e.g. `<@id>` or `<@&role>`) prepended to the
    /// message so responsible parties get pinged.
    pub mention: Option<String>,
}

impl Notice {
    pub fn new(title: impl Into<String>, style: NoticeStyle) -> Self {
        Self {
            title: title.into(),
            body: None,
            footer: None,
            style,
            mention: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = Some(mention.into());
        self
    }
}

/// Alert delivery seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a new notice. Returns `Ok(None)` when alerts are
    /// suppressed (no destination configured); callers treat that as
    /// success and keep transitioning state.
    async fn send(&self, notice: Notice) -> Result<Option<NoticeHandle>, DeliveryError>;

    /// Edit a previously delivered notice in place. Must be a no-op for
    /// stale or deleted handles.
    async fn edit(&self, handle: &NoticeHandle, notice: Notice) -> Result<(), DeliveryError>;
}

/// Settings lookup seam.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Where alerts should be delivered. `None` suppresses delivery while
    /// internal state keeps transitioning.
    async fn alert_destination(&self) -> Option<String>;
}

/// Presence text seam. Best-effort: implementations never fail loudly.
#[async_trait]
pub trait PresenceSetter: Send + Sync {
    async fn set_text(&self, text: &str);
}

/// Settings store backed by the loaded configuration.
pub struct StaticSettings {
    destination: Option<String>,
}

impl StaticSettings {
    pub fn new(destination: Option<String>) -> Self {
        Self { destination }
    }
}

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn alert_destination(&self) -> Option<String> {
        self.destination.clone()
    }
}

/// Presence sink that only logs. Webhook delivery has no presence
/// channel, so this stands in for a full chat-client integration.
pub struct LogPresence;

#[async_trait]
impl PresenceSetter for LogPresence {
    async fn set_text(&self, text: &str) {
        tracing::debug!(presence = text, "Presence updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_settings() {
        let configured = StaticSettings::new(Some("https://example.invalid/hook".into()));
        assert_eq!(
            configured.alert_destination().await.as_deref(),
            Some("https://example.invalid/hook")
        );

        let suppressed = StaticSettings::new(None);
        assert!(suppressed.alert_destination().await.is_none());
    }

    #[test]
    fn test_notice_builders() {
        let notice = Notice::new("Server terminated the connection", NoticeStyle::Error)
            .with_body("1011: internal error")
            .with_footer("Reconnection attempts: 3")
            .with_mention("<@&42>");

        assert_eq!(notice.title, "Server terminated the connection");
        assert_eq!(notice.body.as_deref(), Some("1011: internal error"));
        assert_eq!(notice.footer.as_deref(), Some("Reconnection attempts: 3"));
        assert_eq!(notice.mention.as_deref(), Some("<@&42>"));
    }
}
