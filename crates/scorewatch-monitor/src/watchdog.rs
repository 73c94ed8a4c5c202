//! Data-delay watchdog
//!
//! A silent-but-open socket is a distinct failure mode from a closed
//! one: the connection supervisor only sees terminations, so this timer
//! watches the time since the last observed item. It maintains one
//! edited-in-place status line, and raises a single mention alert per
//! silence episode (the `alert_active` flag is the hysteresis gate,
//! cleared as soon as data flows again). Only the item-ingestion path
//! writes the observation timestamp; this task only reads it.

use scorewatch_core::{FeedStatus, Notice, NoticeHandle, NoticeStyle, Notifier};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

pub struct DataDelayWatchdog {
    status: Arc<FeedStatus>,
    notifier: Arc<dyn Notifier>,
    period: Duration,
    threshold: Duration,
    mention: Option<String>,
    status_line: Option<NoticeHandle>,
    alert_active: bool,
    shutdown: watch::Receiver<bool>,
}

impl DataDelayWatchdog {
    pub fn new(
        status: Arc<FeedStatus>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
        threshold: Duration,
        mention: Option<String>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            status,
            notifier,
            period,
            threshold,
            mention,
            status_line: None,
            alert_active: false,
            shutdown,
        }
    }

    pub fn alert_active(&self) -> bool {
        self.alert_active
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let elapsed = self.status.last_item_elapsed();
                    self.evaluate(elapsed).await;
                }
                _ = self.shutdown.changed() => break,
            }
        }
    }

    /// One watchdog tick against an observed elapsed time.
    pub async fn evaluate(&mut self, elapsed: Option<Duration>) {
        let Some(elapsed) = elapsed else {
            // Nothing has ever arrived; keep refreshing one status line,
            // never alert.
            self.publish_status_line("Waiting for the first score to arrive...")
                .await;
            return;
        };

        let line = format!("Last score received {} ago", format_elapsed(elapsed));
        self.publish_status_line(&line).await;

        if elapsed > self.threshold {
            if !self.alert_active {
                self.alert_active = true;
                self.send_silence_alert(elapsed).await;
                // The next tick starts a fresh status message; one alert
                // per silence episode, not per tick.
                self.status_line = None;
            }
        } else {
            self.alert_active = false;
        }
    }

    async fn send_silence_alert(&self, elapsed: Duration) {
        let mut notice = Notice::new(
            "No scores are coming through the feed",
            NoticeStyle::Error,
        )
        .with_body(format!(
            "Nothing has arrived for {}.",
            format_elapsed(elapsed)
        ));
        if let Some(ref mention) = self.mention {
            notice = notice.with_mention(mention.clone());
        }

        if let Err(e) = self.notifier.send(notice).await {
            warn!(error = %e, "Failed to deliver silence alert");
        }
    }

    async fn publish_status_line(&mut self, line: &str) {
        let notice = Notice::new(line, NoticeStyle::Info);

        match self.status_line.clone() {
            Some(handle) => {
                if let Err(e) = self.notifier.edit(&handle, notice).await {
                    warn!(error = %e, "Failed to edit status line, starting a new one");
                    self.status_line = None;
                }
            }
            None => match self.notifier.send(notice).await {
                Ok(handle) => self.status_line = handle,
                Err(e) => warn!(error = %e, "Failed to publish status line"),
            },
        }
    }
}

/// Minutes-and-seconds rendering for status text.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
