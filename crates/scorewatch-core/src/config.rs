//! Application configuration
//!
//! Loaded from a toml file (`config/default.toml` by default, overridable
//! via the `SCOREWATCH_CONFIG` env var). Every field has a default so a
//! missing file still yields a runnable configuration.

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub health: HealthConfig,
    pub stats: StatsConfig,
    pub discord: DiscordConfig,
}

/// Stream feed settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// WebSocket URL of the live score feed.
    pub ws_url: String,
    /// Delay between reconnection attempts.
    pub reconnect_delay_secs: u64,
    /// Silence longer than this raises the data-delay alert.
    pub silence_threshold_secs: u64,
    /// How often the data-delay watchdog wakes up.
    pub watchdog_period_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://api.beatleader.xyz/scores".to_string(),
            reconnect_delay_secs: 2,
            silence_threshold_secs: 60,
            watchdog_period_secs: 10,
        }
    }
}

impl FeedConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn silence_threshold(&self) -> Duration {
        Duration::from_secs(self.silence_threshold_secs)
    }

    pub fn watchdog_period(&self) -> Duration {
        Duration::from_secs(self.watchdog_period_secs)
    }
}

/// HTTP health check settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Frontend URL polled for liveness.
    pub url: String,
    pub poll_period_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            url: "https://beatleader.xyz/".to_string(),
            poll_period_secs: 10,
        }
    }
}

impl HealthConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_secs)
    }
}

/// Throughput stats settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Trailing window for the hourly counters.
    pub window_secs: u64,
    /// How often the presence text is refreshed.
    pub presence_period_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_secs: 3600,
            presence_period_secs: 60,
        }
    }
}

impl StatsConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn presence_period(&self) -> Duration {
        Duration::from_secs(self.presence_period_secs)
    }
}

/// Discord delivery settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DiscordConfig {
    /// Webhook destination. `None` suppresses all alerts while internal
    /// state keeps transitioning.
    pub webhook_url: Option<String>,
    /// Mention string included in attention alerts (e.g. `<@&role_id>`).
    pub mention: Option<String>,
    /// Log payloads instead of sending them.
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from a toml file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from toml text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.watchdog_period_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.watchdog_period_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.health.poll_period_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "health.poll_period_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.feed.silence_threshold(), Duration::from_secs(60));
        assert_eq!(config.feed.watchdog_period(), Duration::from_secs(10));
        assert_eq!(config.stats.window(), Duration::from_secs(3600));
        assert!(config.discord.webhook_url.is_none());
        assert!(!config.discord.dry_run);
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"
            [feed]
            ws_url = "wss://feed.example/scores"
            silence_threshold_secs = 90

            [discord]
            webhook_url = "https://discord.com/api/webhooks/1/abc"
            mention = "<@&42>"
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.ws_url, "wss://feed.example/scores");
        assert_eq!(config.feed.silence_threshold(), Duration::from_secs(90));
        // Untouched sections fall back to defaults
        assert_eq!(config.feed.watchdog_period_secs, 10);
        assert_eq!(config.health.poll_period_secs, 10);
        assert_eq!(
            config.discord.webhook_url.as_deref(),
            Some("https://discord.com/api/webhooks/1/abc")
        );
        assert_eq!(config.discord.mention.as_deref(), Some("<@&42>"));
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = AppConfig::parse(
            r#"
            [feed]
            watchdog_period_secs = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            AppConfig::parse("feed = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
