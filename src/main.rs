//! Scorewatch - live health supervisor for the score feed
//!
//! Supervises the score feed WebSocket and the service frontend, and
//! delivers deduplicated Discord status alerts.

use anyhow::{Context, Result};
use scorewatch_core::{
    AppConfig, FeedStatus, LogPresence, Notice, NoticeStyle, Notifier, PresenceSetter,
    SettingsStore, StaticSettings,
};
use scorewatch_discord::{DiscordNotifier, WebhookClient, WebhookClientConfig};
use scorewatch_monitor::{
    AlertStateMachine, DataDelayWatchdog, FeedSupervisor, HealthPoller, PresenceRefresher,
    ThroughputStats,
};
use scorewatch_observability::init_from_env;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

fn load_config() -> Result<AppConfig> {
    let config_path =
        std::env::var("SCOREWATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if std::path::Path::new(&config_path).exists() {
        AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path))
    } else {
        info!("Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_from_env();

    let config = load_config()?;

    // Delivery collaborators
    let settings: Arc<dyn SettingsStore> =
        Arc::new(StaticSettings::new(config.discord.webhook_url.clone()));
    let client = WebhookClient::new(WebhookClientConfig {
        dry_run: config.discord.dry_run,
        ..Default::default()
    })
    .context("Failed to build webhook client")?;
    let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(client, settings));
    let presence: Arc<dyn PresenceSetter> = Arc::new(LogPresence);

    // Shared state
    let status = Arc::new(FeedStatus::new());
    let stats = Arc::new(ThroughputStats::new(config.stats.window()));

    // Graceful shutdown on ctrl+c
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install ctrl+c handler");
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = notifier
        .send(Notice::new(
            format!("Scorewatch v{} started", env!("CARGO_PKG_VERSION")),
            NoticeStyle::Warning,
        ))
        .await
    {
        warn!(error = %e, "Failed to send startup notice");
    }

    // Independent timers
    let watchdog = DataDelayWatchdog::new(
        status.clone(),
        notifier.clone(),
        config.feed.watchdog_period(),
        config.feed.silence_threshold(),
        config.discord.mention.clone(),
        shutdown_rx.clone(),
    );
    let watchdog_handle = tokio::spawn(watchdog.run());

    let poller = HealthPoller::new(
        config.health.url.clone(),
        config.health.poll_period(),
        notifier.clone(),
        shutdown_rx.clone(),
    );
    let poller_handle = tokio::spawn(poller.run());

    let refresher = PresenceRefresher::new(
        stats.clone(),
        status.clone(),
        presence.clone(),
        config.stats.presence_period(),
        shutdown_rx.clone(),
    );
    let refresher_handle = tokio::spawn(refresher.run());

    // The stream supervisor drives the alert state machine from the same
    // task that reads the socket, so transitions need no locking.
    let mut alerts = AlertStateMachine::new(notifier, presence);
    let mut supervisor = FeedSupervisor::new(
        config.feed.ws_url.clone(),
        config.feed.reconnect_delay(),
        status,
        stats,
        shutdown_rx,
    );

    info!(url = %config.feed.ws_url, "Scorewatch started");
    supervisor.run(&mut alerts).await;

    watchdog_handle.abort();
    poller_handle.abort();
    refresher_handle.abort();

    info!("Scorewatch stopped");
    Ok(())
}
