//! HTTP health poller
//!
//! Periodic liveness check of the service frontend with the same up/down
//! hysteresis as the connection alerts, keyed off the HTTP status rather
//! than socket events. A request failure before any status code arrives
//! is treated the same as an offline response.

use scorewatch_core::{Notice, NoticeStyle, Notifier, PollError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Longest response-body excerpt carried in an offline notice.
const BODY_EXCERPT_MAX: usize = 600;

/// Outcome of one health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthCheck {
    Up,
    Down { detail: String },
}

pub struct HealthPoller {
    client: reqwest::Client,
    url: String,
    period: Duration,
    notifier: Arc<dyn Notifier>,
    server_ok: bool,
    shutdown: watch::Receiver<bool>,
}

impl HealthPoller {
    pub fn new(
        url: String,
        period: Duration,
        notifier: Arc<dyn Notifier>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            period,
            notifier,
            // Starts pessimistic so the first healthy poll announces the
            // service is up.
            server_ok: false,
            shutdown,
        }
    }

    pub fn server_ok(&self) -> bool {
        self.server_ok
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let check = match self.check_once().await {
                        Ok(check) => check,
                        Err(e) => HealthCheck::Down {
                            detail: e.to_string(),
                        },
                    };
                    self.apply(check).await;
                }
                _ = self.shutdown.changed() => break,
            }
        }
    }

    async fn check_once(&self) -> Result<HealthCheck, PollError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                PollError::Timeout
            } else {
                PollError::Http(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 200 {
            return Ok(HealthCheck::Up);
        }

        let body = response.text().await.unwrap_or_default();
        Ok(HealthCheck::Down {
            detail: format!("HTTP {}: {}", status, excerpt(&body)),
        })
    }

    /// Apply one check result through the hysteresis gate.
    pub async fn apply(&mut self, check: HealthCheck) {
        match check {
            HealthCheck::Up => {
                if !self.server_ok {
                    self.server_ok = true;
                    self.deliver(
                        Notice::new("The server is online", NoticeStyle::Success)
                            .with_body("All systems are operational."),
                    )
                    .await;
                } else {
                    debug!("Health check passed");
                }
            }
            HealthCheck::Down { detail } => {
                if self.server_ok {
                    self.server_ok = false;
                    self.deliver(
                        Notice::new("The server is offline", NoticeStyle::Error)
                            .with_body(detail),
                    )
                    .await;
                } else {
                    debug!(detail = %detail, "Health check still failing");
                }
            }
        }
    }

    async fn deliver(&self, notice: Notice) {
        if let Err(e) = self.notifier.send(notice).await {
            warn!(error = %e, "Failed to deliver health notice");
        }
    }
}

fn excerpt(body: &str) -> &str {
    let mut end = body.len().min(BODY_EXCERPT_MAX);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingNotifier;

    fn poller(notifier: Arc<RecordingNotifier>) -> HealthPoller {
        let (_tx, rx) = watch::channel(false);
        HealthPoller::new(
            "https://health.example/".to_string(),
            Duration::from_secs(10),
            notifier,
            rx,
        )
    }

    fn down(detail: &str) -> HealthCheck {
        HealthCheck::Down {
            detail: detail.to_string(),
        }
    }

    #[tokio::test]
    async fn test_hysteresis_over_status_flaps() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut poller = poller(notifier.clone());

        poller.apply(HealthCheck::Up).await;
        poller.apply(HealthCheck::Up).await;
        poller.apply(down("HTTP 500: upstream dead")).await;
        poller.apply(down("HTTP 500: upstream dead")).await;
        poller.apply(down("HTTP 502: bad gateway")).await;
        poller.apply(HealthCheck::Up).await;

        let styles: Vec<NoticeStyle> = notifier.sent().iter().map(|n| n.style).collect();
        assert_eq!(
            styles,
            vec![NoticeStyle::Success, NoticeStyle::Error, NoticeStyle::Success]
        );
    }

    #[tokio::test]
    async fn test_offline_notice_carries_detail() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut poller = poller(notifier.clone());

        poller.apply(HealthCheck::Up).await;
        poller.apply(down("HTTP 503: maintenance page")).await;

        let offline = notifier
            .sent()
            .into_iter()
            .find(|n| n.style == NoticeStyle::Error)
            .unwrap();
        assert_eq!(offline.body.as_deref(), Some("HTTP 503: maintenance page"));
        assert!(!poller.server_ok());
    }

    #[tokio::test]
    async fn test_first_healthy_poll_announces_online() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut poller = poller(notifier.clone());

        assert!(!poller.server_ok());
        poller.apply(HealthCheck::Up).await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].style, NoticeStyle::Success);
        assert!(poller.server_ok());
    }

    #[tokio::test]
    async fn test_repeated_failures_before_first_success_stay_silent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut poller = poller(notifier.clone());

        poller.apply(down("connection refused")).await;
        poller.apply(down("connection refused")).await;

        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let long = "é".repeat(BODY_EXCERPT_MAX);
        let cut = excerpt(&long);
        assert!(cut.len() <= BODY_EXCERPT_MAX);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
