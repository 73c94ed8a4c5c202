//! Test doubles for the monitor components

use async_trait::async_trait;
use parking_lot::Mutex;
use scorewatch_core::{DeliveryError, Notice, NoticeHandle, Notifier, PresenceSetter};

/// Notifier double that records every send and edit.
#[derive(Default)]
pub struct RecordingNotifier {
    suppressed: bool,
    inner: Mutex<Recorded>,
}

#[derive(Default)]
struct Recorded {
    next_id: u64,
    sent: Vec<Notice>,
    edits: Vec<(String, Notice)>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier with no configured destination: sends succeed but
    /// return no handle.
    pub fn without_destination() -> Self {
        Self {
            suppressed: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.inner.lock().sent.clone()
    }

    pub fn edits(&self) -> Vec<(String, Notice)> {
        self.inner.lock().edits.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notice: Notice) -> Result<Option<NoticeHandle>, DeliveryError> {
        let mut inner = self.inner.lock();
        inner.sent.push(notice);
        if self.suppressed {
            return Ok(None);
        }
        let id = inner.next_id;
        inner.next_id += 1;
        Ok(Some(NoticeHandle(format!("msg-{}", id))))
    }

    async fn edit(&self, handle: &NoticeHandle, notice: Notice) -> Result<(), DeliveryError> {
        self.inner.lock().edits.push((handle.0.clone(), notice));
        Ok(())
    }
}

/// Presence double that records every text update.
#[derive(Default)]
pub struct RecordingPresence {
    texts: Mutex<Vec<String>>,
}

impl RecordingPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

#[async_trait]
impl PresenceSetter for RecordingPresence {
    async fn set_text(&self, text: &str) {
        self.texts.lock().push(text.to_string());
    }
}
