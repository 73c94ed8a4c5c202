//! `Notifier` implementation on top of the webhook client
//!
//! The alert destination is re-read from the settings store on every
//! delivery, so reconfiguring it takes effect without a restart. A
//! missing destination suppresses delivery; callers keep transitioning
//! state regardless.

use crate::client::WebhookClient;
use crate::templates::render_notice;
use async_trait::async_trait;
use scorewatch_core::{DeliveryError, Notice, NoticeHandle, Notifier, SettingsStore};
use std::sync::Arc;
use tracing::debug;

pub struct DiscordNotifier {
    client: WebhookClient,
    settings: Arc<dyn SettingsStore>,
}

impl DiscordNotifier {
    pub fn new(client: WebhookClient, settings: Arc<dyn SettingsStore>) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, notice: Notice) -> Result<Option<NoticeHandle>, DeliveryError> {
        let Some(destination) = self.settings.alert_destination().await else {
            debug!(title = %notice.title, "No alert destination configured, notice suppressed");
            return Ok(None);
        };

        WebhookClient::validate_url(&destination).map_err(DeliveryError::from)?;

        let message = render_notice(&notice);
        let id = self
            .client
            .send(&destination, &message)
            .await
            .map_err(DeliveryError::from)?;
        Ok(Some(NoticeHandle(id)))
    }

    async fn edit(&self, handle: &NoticeHandle, notice: Notice) -> Result<(), DeliveryError> {
        let Some(destination) = self.settings.alert_destination().await else {
            return Ok(());
        };

        let message = render_notice(&notice);
        self.client
            .edit(&destination, &handle.0, &message)
            .await
            .map_err(DeliveryError::from)
    }
}
