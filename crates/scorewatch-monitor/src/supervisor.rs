//! Feed supervisor: keeps the stream connection alive indefinitely
//!
//! One loop iteration is one connection lifecycle: open the socket, emit
//! `Connected`, read items until the stream terminates, emit exactly one
//! close-class event, then reconnect after a short delay. Failed connect
//! attempts never emit events; they bump the shared attempt counter and
//! notify the alert state machine so the pending notice's footer keeps
//! counting. Nothing here is fatal: every error path re-enters the loop.

use crate::alerts::AlertStateMachine;
use crate::stats::ThroughputStats;
use futures::StreamExt;
use scorewatch_core::{ConnectionEvent, FeedStatus};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One score payload from the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreItem {
    pub player: PlayerInfo,
    #[serde(rename = "modifiedScore")]
    pub modified_score: i64,
    pub leaderboard: LeaderboardInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardInfo {
    pub id: String,
    pub song: SongInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongInfo {
    pub name: String,
    #[serde(default)]
    pub author: String,
}

pub struct FeedSupervisor {
    ws_url: String,
    reconnect_delay: Duration,
    status: Arc<FeedStatus>,
    stats: Arc<ThroughputStats>,
    shutdown: watch::Receiver<bool>,
}

impl FeedSupervisor {
    pub fn new(
        ws_url: String,
        reconnect_delay: Duration,
        status: Arc<FeedStatus>,
        stats: Arc<ThroughputStats>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ws_url,
            reconnect_delay,
            status,
            stats,
            shutdown,
        }
    }

    /// Supervising loop; returns only on shutdown.
    pub async fn run(&mut self, alerts: &mut AlertStateMachine) {
        loop {
            if self.shutting_down() {
                break;
            }

            match connect_async(&self.ws_url).await {
                Ok((stream, _)) => {
                    info!(url = %self.ws_url, "Feed WebSocket connected");
                    self.status.set_connected(true);
                    self.status.reset_attempts();
                    alerts.handle_event(ConnectionEvent::Connected).await;

                    let event = self.read_stream(stream).await;
                    self.status.set_connected(false);

                    match event {
                        Some(event) => {
                            warn!(?event, "Feed WebSocket terminated, reconnecting");
                            alerts.handle_event(event).await;
                        }
                        // Operator shutdown mid-read: no close event, no
                        // spurious alert.
                        None => break,
                    }
                }
                Err(e) => {
                    let attempts = self.status.record_failed_attempt();
                    debug!(error = %e, attempts, "Feed connect attempt failed");
                    alerts.note_retry_attempt().await;
                }
            }

            if !self.sleep_between_attempts().await {
                break;
            }
        }

        info!("Feed supervisor stopped");
    }

    /// Read items until the stream terminates. Returns the close-class
    /// event, or `None` when shutdown aborted the read.
    async fn read_stream(&mut self, mut stream: FeedStream) -> Option<ConnectionEvent> {
        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || self.shutting_down() {
                        return None;
                    }
                }
                msg = stream.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.ingest_item(&text),
                    Some(Ok(Message::Close(frame))) => return Some(close_event(frame)),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Some(ConnectionEvent::Failed(e.to_string())),
                    None => return Some(ConnectionEvent::ClosedGracefully),
                }
            }
        }
    }

    fn ingest_item(&self, text: &str) {
        // Any payload counts as feed liveness, parseable or not.
        self.status.record_item();

        match serde_json::from_str::<ScoreItem>(text) {
            Ok(item) => {
                debug!(
                    player = %item.player.name,
                    score = item.modified_score,
                    song = %item.leaderboard.song.name,
                    "Score received"
                );
                self.stats.record_score(&item.player.id, &item.leaderboard.id);
            }
            Err(e) => {
                debug!(error = %e, "Unparseable feed item");
            }
        }
    }

    fn shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Returns false when shutdown arrived during the wait.
    async fn sleep_between_attempts(&mut self) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.reconnect_delay) => true,
            changed = self.shutdown.changed() => {
                changed.is_ok() && !self.shutting_down()
            }
        }
    }
}

/// Map a close frame onto a connection event.
///
/// A normal-code close (or a bare close with no frame) is graceful;
/// everything else carries its reason text, falling back to the numeric
/// close code when the server sent none.
fn close_event(frame: Option<CloseFrame<'_>>) -> ConnectionEvent {
    match frame {
        None => ConnectionEvent::ClosedGracefully,
        Some(frame) if frame.code == CloseCode::Normal => ConnectionEvent::ClosedGracefully,
        Some(frame) => {
            let reason = if frame.reason.is_empty() {
                format!("close code {}", u16::from(frame.code))
            } else {
                frame.reason.to_string()
            };
            ConnectionEvent::ClosedWithReason(reason)
        }
    }
}
