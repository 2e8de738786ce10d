//! Shared write half of the AI connection.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::SinkExt;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::debug;

use crate::core::realtime::{ClientEvent, RealtimeError, RealtimeResult, RealtimeSink};

/// Write half of the AI connection shared by both relays.
///
/// The open flag is checked while holding the sink lock, so once
/// [`RealtimeLink::close`] has returned no further frame reaches the sink.
pub struct RealtimeLink {
    sink: Mutex<RealtimeSink>,
    open: AtomicBool,
    closed: CancellationToken,
}

impl RealtimeLink {
    pub fn new(sink: RealtimeSink) -> Self {
        Self {
            sink: Mutex::new(sink),
            open: AtomicBool::new(true),
            closed: CancellationToken::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Serialize and send one client event.
    ///
    /// Returns `Ok(false)` without sending when the link is already closed.
    pub async fn send(&self, event: &ClientEvent) -> RealtimeResult<bool> {
        let text = serde_json::to_string(event)
            .map_err(|e| RealtimeError::SerializationError(e.to_string()))?;

        let mut sink = self.sink.lock().await;
        if !self.is_open() {
            return Ok(false);
        }

        sink.send(Message::Text(text.into()))
            .await
            .map_err(|e| RealtimeError::WebSocketError(e.to_string()))?;
        Ok(true)
    }

    /// Close the AI connection.
    ///
    /// Only the first call closes the sink and returns `true`; concurrent or
    /// repeated calls are no-ops.
    pub async fn close(&self) -> bool {
        if !self.open.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.closed.cancel();

        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.close().await {
            debug!(error = %e, "AI connection was already closed");
        }
        true
    }

    /// Resolves once [`RealtimeLink::close`] has been called.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }
}

impl std::fmt::Debug for RealtimeLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeLink")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
