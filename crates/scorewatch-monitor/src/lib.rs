//! Scorewatch Monitor
//!
//! Live supervision of the score feed: the reconnecting stream
//! supervisor, the alert state machine that deduplicates status notices,
//! the data-delay watchdog, the HTTP health poller, and the hourly
//! throughput stats behind the presence text.

pub mod alerts;
pub mod poller;
pub mod presence;
pub mod stats;
pub mod supervisor;
pub mod watchdog;

pub use alerts::{AlertStateMachine, LinkState};
pub use poller::{HealthCheck, HealthPoller};
pub use presence::PresenceRefresher;
pub use stats::{ThroughputSnapshot, ThroughputStats};
pub use supervisor::FeedSupervisor;
pub use watchdog::DataDelayWatchdog;

#[cfg(test)]
pub(crate) mod testutil;
