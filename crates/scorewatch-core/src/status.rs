//! Shared feed status
//!
//! Cross-task snapshot of the stream connection: whether it is up, when
//! the last data item was observed, and how many consecutive connection
//! attempts have failed since the last success.
//!
//! Single-writer discipline: only the stream-read task writes
//! `last_item_ms` and the attempt counter; the watchdog and presence
//! tasks only read. Timestamps are stored as millis elapsed since a
//! reference instant so reads are plain atomic loads and can never
//! observe a torn value.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Sentinel for "no item observed yet".
const NEVER: u64 = u64::MAX;

/// Shared connection and liveness state for the feed.
pub struct FeedStatus {
    start_instant: Instant,
    connected: AtomicBool,
    /// Millis since `start_instant` of the last observed item, or `NEVER`.
    last_item_ms: AtomicU64,
    /// Consecutive failed connection attempts since the last success.
    retry_attempts: AtomicU32,
}

impl FeedStatus {
    pub fn new() -> Self {
        Self {
            start_instant: Instant::now(),
            connected: AtomicBool::new(false),
            last_item_ms: AtomicU64::new(NEVER),
            retry_attempts: AtomicU32::new(0),
        }
    }

    /// Record that a data item arrived. Called only from the stream-read
    /// task.
    pub fn record_item(&self) {
        let elapsed = self.start_instant.elapsed().as_millis() as u64;
        self.last_item_ms.store(elapsed, Ordering::Release);
    }

    /// Time since the last observed item, or `None` if nothing has ever
    /// arrived.
    pub fn last_item_elapsed(&self) -> Option<Duration> {
        let last = self.last_item_ms.load(Ordering::Acquire);
        if last == NEVER {
            return None;
        }
        let now = self.start_instant.elapsed().as_millis() as u64;
        Some(Duration::from_millis(now.saturating_sub(last)))
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Record one failed connection attempt, returning the new count.
    pub fn record_failed_attempt(&self) -> u32 {
        self.retry_attempts.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Reset the attempt counter. Called on every successful connect.
    pub fn reset_attempts(&self) {
        self.retry_attempts.store(0, Ordering::Release);
    }

    pub fn attempts(&self) -> u32 {
        self.retry_attempts.load(Ordering::Acquire)
    }
}

impl Default for FeedStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let status = FeedStatus::new();
        assert!(!status.is_connected());
        assert!(status.last_item_elapsed().is_none());
        assert_eq!(status.attempts(), 0);
    }

    #[test]
    fn test_record_item_marks_observed() {
        let status = FeedStatus::new();
        status.record_item();

        let elapsed = status.last_item_elapsed().expect("item was recorded");
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_attempt_counter() {
        let status = FeedStatus::new();
        assert_eq!(status.record_failed_attempt(), 1);
        assert_eq!(status.record_failed_attempt(), 2);
        assert_eq!(status.record_failed_attempt(), 3);

        status.reset_attempts();
        assert_eq!(status.attempts(), 0);
        assert_eq!(status.record_failed_attempt(), 1);
    }

    #[test]
    fn test_connected_flag() {
        let status = FeedStatus::new();
        status.set_connected(true);
        assert!(status.is_connected());
        status.set_connected(false);
        assert!(!status.is_connected());
    }
}
