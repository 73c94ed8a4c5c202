//! Rendering of supervisor notices into webhook messages

use crate::types::{colors, icons, Embed, WebhookMessage};
use chrono::Utc;
use scorewatch_core::{Notice, NoticeStyle};

fn style_color(style: NoticeStyle) -> u32 {
    match style {
        NoticeStyle::Success => colors::ONLINE,
        NoticeStyle::Info => colors::RECONNECTING,
        NoticeStyle::Warning => colors::INTERFERENCE,
        NoticeStyle::Error => colors::OFFLINE,
    }
}

fn style_icon(style: NoticeStyle) -> &'static str {
    match style {
        NoticeStyle::Success => icons::ONLINE,
        NoticeStyle::Info => icons::RECONNECTING,
        NoticeStyle::Warning => icons::INTERFERENCE,
        NoticeStyle::Error => icons::OFFLINE,
    }
}

/// Render a notice as a single-embed webhook message.
///
/// The title goes into the embed author line, detail text into a
/// code-fenced description, and the mention (if any) into the message
/// content so it actually pings.
pub fn render_notice(notice: &Notice) -> WebhookMessage {
    let mut embed = Embed::new()
        .author(&notice.title, Some(style_icon(notice.style).to_string()))
        .color(style_color(notice.style))
        .timestamp(Utc::now().to_rfc3339());

    if let Some(ref body) = notice.body {
        embed = embed.description(format!("```{}```", body));
    }

    if let Some(ref footer) = notice.footer {
        embed = embed.footer(footer);
    }

    let message = WebhookMessage::embed(embed);
    match notice.mention {
        Some(ref mention) => message.with_content(mention),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_styles() {
        let green = render_notice(&Notice::new("Connected to the WebSocket", NoticeStyle::Success));
        assert_eq!(green.embeds[0].color, Some(colors::ONLINE));
        assert_eq!(
            green.embeds[0].author.as_ref().unwrap().name,
            "Connected to the WebSocket"
        );

        let amber = render_notice(&Notice::new("x", NoticeStyle::Warning));
        assert_eq!(amber.embeds[0].color, Some(colors::INTERFERENCE));
        assert_eq!(
            amber.embeds[0].thumbnail.as_ref().map(|_| ()),
            None,
            "icon rides on the author line, not the thumbnail"
        );
    }

    #[test]
    fn test_render_body_is_code_fenced() {
        let notice =
            Notice::new("Server terminated the connection", NoticeStyle::Error).with_body("1011");
        let message = render_notice(&notice);
        assert_eq!(
            message.embeds[0].description.as_deref(),
            Some("```1011```")
        );
    }

    #[test]
    fn test_render_footer_and_mention() {
        let notice = Notice::new("Feed silent", NoticeStyle::Error)
            .with_footer("Reconnection attempts: 4")
            .with_mention("<@&42>");
        let message = render_notice(&notice);

        assert_eq!(message.content.as_deref(), Some("<@&42>"));
        assert_eq!(
            message.embeds[0].footer.as_ref().unwrap().text,
            "Reconnection attempts: 4"
        );
    }
}
