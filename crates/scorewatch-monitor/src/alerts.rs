//! Alert state machine for connection transitions
//!
//! Collapses the raw event stream into at most one notice per outage
//! episode: the first transition into `Disconnected` sends a notice and
//! keeps its handle; every further failure signal while down mutates
//! that one notice's footer instead of sending a new message. The first
//! `Connected` after an outage sends the recovery notice and clears the
//! pending handle.
//!
//! Delivery is best-effort: a failed send or edit is logged and the
//! state still advances, so alerting can never stall connection
//! handling.

use scorewatch_core::{
    classify_close, CloseClass, ConnectionEvent, Notice, NoticeHandle, NoticeStyle, Notifier,
    PresenceSetter,
};
use std::sync::Arc;
use tracing::{info, warn};

const PRESENCE_CONNECTED: &str = "Connected to the score feed";
const PRESENCE_RECONNECTING: &str = "Reconnecting to the score feed...";

/// Connectivity class the alerting layer believes the link is in.
///
/// This is the hysteresis gate, not the literal socket state: it only
/// flips on the first event of the opposite class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// The one mutable "reconnecting" notice for the current outage episode.
#[derive(Debug)]
struct PendingNotice {
    /// `None` when delivery was suppressed or failed; attempts are still
    /// counted so a later episode starts clean.
    handle: Option<NoticeHandle>,
    base: Notice,
    attempts: u32,
}

pub struct AlertStateMachine {
    state: LinkState,
    pending: Option<PendingNotice>,
    notifier: Arc<dyn Notifier>,
    presence: Arc<dyn PresenceSetter>,
}

impl AlertStateMachine {
    pub fn new(notifier: Arc<dyn Notifier>, presence: Arc<dyn PresenceSetter>) -> Self {
        Self {
            state: LinkState::Disconnected,
            pending: None,
            notifier,
            presence,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Reconnection attempts within the current episode.
    pub fn attempts(&self) -> u32 {
        self.pending.as_ref().map(|p| p.attempts).unwrap_or(0)
    }

    /// Consume one connection event from the supervisor.
    pub async fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => self.on_connected().await,
            down => self.on_down(down).await,
        }
    }

    /// Observe one failed reconnection attempt from the transport layer.
    ///
    /// Attempts arriving while no episode is open (no pending notice) are
    /// dropped; the footer only ever counts attempts within the current
    /// episode.
    pub async fn note_retry_attempt(&mut self) {
        self.bump_attempts().await;
    }

    async fn on_connected(&mut self) {
        let was_down = self.state == LinkState::Disconnected;
        self.state = LinkState::Connected;
        self.pending = None;
        self.presence.set_text(PRESENCE_CONNECTED).await;

        if was_down {
            info!("Feed link up");
            self.deliver(Notice::new(
                "Connected to the WebSocket",
                NoticeStyle::Success,
            ))
            .await;
        }
    }

    async fn on_down(&mut self, event: ConnectionEvent) {
        match self.state {
            LinkState::Connected => {
                let notice = match &event {
                    ConnectionEvent::ClosedGracefully => Notice::new(
                        "Server gracefully closed the WebSocket connection, reconnecting...",
                        NoticeStyle::Info,
                    ),
                    ConnectionEvent::ClosedWithReason(reason) => match classify_close(reason) {
                        CloseClass::Graceful => Notice::new(
                            "Server gracefully closed the WebSocket connection, reconnecting...",
                            NoticeStyle::Info,
                        ),
                        CloseClass::ProviderInterference => Notice::new(
                            "Cloudflare closed the WebSocket connection, reconnecting...",
                            NoticeStyle::Warning,
                        )
                        .with_body(reason.clone()),
                        CloseClass::Abnormal => Notice::new(
                            "Server terminated the WebSocket connection, reconnecting...",
                            NoticeStyle::Error,
                        )
                        .with_body(reason.clone()),
                    },
                    ConnectionEvent::Failed(error) => Notice::new(
                        "An unexpected error occurred on the WebSocket connection, reconnecting...",
                        NoticeStyle::Error,
                    )
                    .with_body(error.clone()),
                    // Handled by the caller.
                    ConnectionEvent::Connected => return,
                };

                self.state = LinkState::Disconnected;
                self.presence.set_text(PRESENCE_RECONNECTING).await;

                info!(?event, "Feed link down");
                let handle = self.deliver(notice.clone()).await;
                self.pending = Some(PendingNotice {
                    handle,
                    base: notice,
                    attempts: 0,
                });
            }
            LinkState::Disconnected => {
                // Repeated down-class event within the same episode: no
                // new notice, counts as one more attempt.
                self.bump_attempts().await;
            }
        }
    }

    async fn bump_attempts(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        pending.attempts += 1;

        let notice = pending
            .base
            .clone()
            .with_footer(format!("Reconnection attempts: {}", pending.attempts));

        if let Some(handle) = pending.handle.clone() {
            if let Err(e) = self.notifier.edit(&handle, notice).await {
                warn!(error = %e, "Failed to update reconnect notice");
            }
        }
    }

    async fn deliver(&self, notice: Notice) -> Option<NoticeHandle> {
        match self.notifier.send(notice).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Failed to deliver status notice");
                None
            }
        }
    }
}
