//! Hourly throughput stats
//!
//! The three trailing-window counters behind the presence text: total
//! scores (unkeyed), distinct players, and distinct maps. Written only
//! by the stream-item path, read by the presence refresher. A single
//! mutex guards all three so trim+append and reads are one atomic step
//! and a reader can never observe a counter mid-trim.

use parking_lot::Mutex;
use scorewatch_core::{KeyedSlidingWindow, SlidingWindow};
use std::time::{Duration, Instant};

pub struct ThroughputStats {
    inner: Mutex<Counters>,
}

struct Counters {
    scores: SlidingWindow,
    players: KeyedSlidingWindow<String>,
    maps: KeyedSlidingWindow<String>,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputSnapshot {
    pub scores: usize,
    pub players: usize,
    pub maps: usize,
}

impl ThroughputSnapshot {
    /// One-line summary for the presence text.
    pub fn summary(&self) -> String {
        format!(
            "{} scores/hr from {} players on {} maps",
            self.scores, self.players, self.maps
        )
    }
}

impl ThroughputStats {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Mutex::new(Counters {
                scores: SlidingWindow::new(window),
                players: KeyedSlidingWindow::new(window),
                maps: KeyedSlidingWindow::new(window),
            }),
        }
    }

    /// Record one score event.
    pub fn record_score(&self, player_id: &str, map_id: &str) {
        let now = Instant::now();
        let mut counters = self.inner.lock();
        counters.scores.record(now);
        counters.players.record(player_id.to_string(), now);
        counters.maps.record(map_id.to_string(), now);
    }

    pub fn snapshot(&self) -> ThroughputSnapshot {
        let now = Instant::now();
        let mut counters = self.inner.lock();
        ThroughputSnapshot {
            scores: counters.scores.count(now),
            players: counters.players.distinct_keys(now),
            maps: counters.maps.distinct_keys(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_distinct_keys() {
        let stats = ThroughputStats::new(Duration::from_secs(3600));

        stats.record_score("alice", "map-1");
        stats.record_score("alice", "map-2");
        stats.record_score("bob", "map-1");

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.scores, 3);
        assert_eq!(snapshot.players, 2);
        assert_eq!(snapshot.maps, 2);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = ThroughputStats::new(Duration::from_secs(3600));
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.scores, 0);
        assert_eq!(snapshot.players, 0);
        assert_eq!(snapshot.maps, 0);
    }

    #[test]
    fn test_summary_text() {
        let snapshot = ThroughputSnapshot {
            scores: 120,
            players: 34,
            maps: 17,
        };
        assert_eq!(snapshot.summary(), "120 scores/hr from 34 players on 17 maps");
    }
}
