//! Discord webhook wire types

use serde::{Deserialize, Serialize};

/// Discord webhook message payload
#[derive(Debug, Clone, Serialize, Default)]
pub struct WebhookMessage {
    /// Plain text content; carries mentions so pings fire (embed text
    /// never pings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Rich embeds (up to 10)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// Create a new message with a single embed
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    /// Set the plain text content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Discord embed for rich message formatting
#[derive(Debug, Clone, Serialize, Default)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Embed description (up to 4096 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Embed color as integer (decimal representation of hex color)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    /// ISO8601 timestamp shown next to the footer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the embed color from hex (e.g. `0x1EA929`)
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedImage { url: url.into() });
        self
    }

    /// Set the author line (name + optional icon), the header slot the
    /// status notices use for their title text.
    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }
}

/// Discord embed footer
#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    /// Footer text (up to 2048 characters)
    pub text: String,
}

/// Discord embed image or thumbnail
#[derive(Debug, Clone, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

/// Discord embed author
#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Response from the webhook API when `?wait=true` is set
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookReply {
    /// Message id of the created message
    pub id: Option<String>,

    /// Error code (if the request failed)
    pub code: Option<u32>,

    /// Error message (if the request failed)
    pub message: Option<String>,

    /// Retry after (seconds) for rate limits
    pub retry_after: Option<f64>,
}

/// Status colors for the supervisor notices
pub mod colors {
    /// Green - connected / back online
    pub const ONLINE: u32 = 0x1EA929;
    /// Blue - graceful closure, neutral status
    pub const RECONNECTING: u32 = 0x2485CA;
    /// Red - terminated / offline
    pub const OFFLINE: u32 = 0xCA2424;
    /// Amber - provider interference, degraded conditions
    pub const INTERFERENCE: u32 = 0xCA7F24;
}

/// Thumbnail icons for the supervisor notices
pub mod icons {
    pub const ONLINE: &str =
        "https://cdn.discordapp.com/attachments/1068292632855457882/1068292759045283840/online.png";
    pub const RECONNECTING: &str =
        "https://cdn.discordapp.com/attachments/1068292632855457882/1068292759389225121/reconnecting.png";
    pub const OFFLINE: &str =
        "https://cdn.discordapp.com/attachments/1068292632855457882/1068292758755885066/offline.png";
    pub const INTERFERENCE: &str =
        "https://media.discordapp.net/attachments/1068292632855457882/1068292759666044958/cloudflare.png";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_serialization() {
        let embed = Embed::new()
            .author("Connected to the WebSocket", Some(icons::ONLINE.to_string()))
            .color(colors::ONLINE)
            .footer("Reconnection attempts: 3");

        let json = serde_json::to_string(&embed).unwrap();
        assert!(json.contains("\"name\":\"Connected to the WebSocket\""));
        assert!(json.contains("\"color\":2009385")); // 0x1EA929 in decimal
        assert!(json.contains("\"text\":\"Reconnection attempts: 3\""));
        assert!(!json.contains("description"));
    }

    #[test]
    fn test_message_content_carries_mentions() {
        let msg = WebhookMessage::embed(Embed::new().title("Feed silent"))
            .with_content("<@&42>");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"content\":\"<@&42>\""));
        assert!(json.contains("\"embeds\""));
    }

    #[test]
    fn test_empty_message_serializes_bare() {
        let msg = WebhookMessage::default();
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_reply_parses_message_id() {
        let reply: WebhookReply =
            serde_json::from_str(r#"{"id":"1102337106"}"#).unwrap();
        assert_eq!(reply.id.as_deref(), Some("1102337106"));
        assert!(reply.retry_after.is_none());
    }

    #[test]
    fn test_reply_parses_rate_limit() {
        let reply: WebhookReply = serde_json::from_str(
            r#"{"message":"You are being rate limited.","retry_after":3.2,"code":0}"#,
        )
        .unwrap();
        assert_eq!(reply.retry_after, Some(3.2));
    }
}
