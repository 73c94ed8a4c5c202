//! Presence refresher
//!
//! Periodically rewrites the presence text with the hourly throughput
//! summary while the feed is connected. The alert state machine owns the
//! connected/reconnecting presence transitions; this task only freshens
//! the numbers in between.

use crate::stats::ThroughputStats;
use scorewatch_core::{FeedStatus, PresenceSetter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct PresenceRefresher {
    stats: Arc<ThroughputStats>,
    status: Arc<FeedStatus>,
    presence: Arc<dyn PresenceSetter>,
    period: Duration,
    shutdown: watch::Receiver<bool>,
}

impl PresenceRefresher {
    pub fn new(
        stats: Arc<ThroughputStats>,
        status: Arc<FeedStatus>,
        presence: Arc<dyn PresenceSetter>,
        period: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            stats,
            status,
            presence,
            period,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh().await,
                _ = self.shutdown.changed() => break,
            }
        }
    }

    async fn refresh(&self) {
        // While reconnecting the state machine owns the presence text.
        if !self.status.is_connected() {
            return;
        }
        let snapshot = self.stats.snapshot();
        self.presence.set_text(&snapshot.summary()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingPresence;

    fn refresher(
        status: Arc<FeedStatus>,
        presence: Arc<RecordingPresence>,
    ) -> PresenceRefresher {
        let (_tx, rx) = watch::channel(false);
        let stats = Arc::new(ThroughputStats::new(Duration::from_secs(3600)));
        stats.record_score("alice", "map-1");
        stats.record_score("bob", "map-1");
        PresenceRefresher::new(stats, status, presence, Duration::from_secs(60), rx)
    }

    #[tokio::test]
    async fn test_refresh_publishes_summary_when_connected() {
        let status = Arc::new(FeedStatus::new());
        status.set_connected(true);
        let presence = Arc::new(RecordingPresence::new());

        refresher(status, presence.clone()).refresh().await;

        assert_eq!(
            presence.texts(),
            vec!["2 scores/hr from 2 players on 1 maps".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_skips_while_reconnecting() {
        let status = Arc::new(FeedStatus::new());
        let presence = Arc::new(RecordingPresence::new());

        refresher(status, presence.clone()).refresh().await;

        assert!(presence.texts().is_empty());
    }
}
