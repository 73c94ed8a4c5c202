//! Sliding-window event counters
//!
//! Time-bounded counters used to summarize feed throughput over the
//! trailing hour. Timestamps are trimmed against the window on every
//! write and every read so the externally visible counts are accurate
//! at all times. Each call takes a single `now` so one counting pass
//! never compares against a moving clock.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default trailing window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);

/// Unkeyed sliding-window counter.
#[derive(Debug)]
pub struct SlidingWindow {
    window: Duration,
    events: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            events: VecDeque::new(),
        }
    }

    /// Record one event at `now`, evicting entries that have aged out.
    pub fn record(&mut self, now: Instant) {
        self.events.push_back(now);
        self.trim(now);
    }

    /// Number of events within the trailing window ending at `now`.
    pub fn count(&mut self, now: Instant) -> usize {
        self.trim(now);
        self.events.len()
    }

    fn trim(&mut self, now: Instant) {
        let cutoff = now.checked_sub(self.window);
        let Some(cutoff) = cutoff else { return };
        // An entry exactly `window` old is still inside the trailing window.
        while let Some(front) = self.events.front() {
            if *front < cutoff {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Keyed sliding-window counter.
///
/// Writes trim only the touched key, so cost is paid by keys that are
/// actually written; reads trim every key so `distinct_keys` is exact
/// at the moment of the call.
#[derive(Debug)]
pub struct KeyedSlidingWindow<K: Eq + Hash> {
    window: Duration,
    entries: HashMap<K, VecDeque<Instant>>,
}

impl<K: Eq + Hash> KeyedSlidingWindow<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// Record one event for `key` at `now`.
    pub fn record(&mut self, key: K, now: Instant) {
        let events = self.entries.entry(key).or_default();
        events.push_back(now);
        Self::trim_one(events, self.window, now);
    }

    /// Number of keys with at least one event in the trailing window
    /// ending at `now`.
    pub fn distinct_keys(&mut self, now: Instant) -> usize {
        let window = self.window;
        self.entries.retain(|_, events| {
            Self::trim_one(events, window, now);
            !events.is_empty()
        });
        self.entries.len()
    }

    fn trim_one(events: &mut VecDeque<Instant>, window: Duration, now: Instant) {
        let Some(cutoff) = now.checked_sub(window) else {
            return;
        };
        while let Some(front) = events.front() {
            if *front < cutoff {
                events.pop_front();
            } else {
                break;
            }
        }
    }
}

impl<K: Eq + Hash> Default for KeyedSlidingWindow<K> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
