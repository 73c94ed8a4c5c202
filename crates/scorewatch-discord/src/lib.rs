//! Discord webhook delivery for scorewatch alerts
//!
//! Implements the `scorewatch_core::Notifier` seam on top of Discord
//! webhooks: sends return the created message id so later edits can
//! mutate one notice in place instead of flooding the channel.

mod client;
mod error;
mod notifier;
mod templates;
mod types;

pub use client::{WebhookClient, WebhookClientConfig};
pub use error::DiscordError;
pub use notifier::DiscordNotifier;
pub use templates::render_notice;
pub use types::{colors, icons, Embed, EmbedAuthor, EmbedFooter, WebhookMessage, WebhookReply};
