//! AI -> telephony direction of a call.

use std::sync::Arc;

use axum::extract::ws::Message as TelephonyMessage;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, trace, warn};

use super::{RealtimeLink, SessionError, SessionResult, StreamId, TelephonySink};
use crate::core::audio::reencode_audio;
use crate::core::realtime::{RealtimeEvent, RealtimeStream, ServerEventEnvelope};
use crate::core::telephony::TelephonyOutgoing;

/// Relay AI events to the telephony socket until the AI side ends.
///
/// The telephony socket is never closed from here; only the AI connection is.
pub(super) async fn relay_outbound(
    mut realtime_rx: RealtimeStream,
    mut telephony_tx: TelephonySink,
    link: Arc<RealtimeLink>,
    stream_id: Arc<StreamId>,
) -> SessionResult<()> {
    let result = loop {
        let frame = tokio::select! {
            biased;
            _ = link.closed() => break Ok(()),
            frame = realtime_rx.next() => frame,
        };

        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(frame))) => {
                info!(?frame, "AI connection closed by server");
                break Ok(());
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(error = %e, "AI websocket error");
                break Ok(());
            }
            None => {
                info!("AI connection ended");
                break Ok(());
            }
        };

        if let Err(e) = handle_server_event(text.as_str(), &mut telephony_tx, &stream_id).await {
            break Err(e);
        }
    };

    link.close().await;
    result
}

async fn handle_server_event(
    text: &str,
    telephony_tx: &mut TelephonySink,
    stream_id: &StreamId,
) -> SessionResult<()> {
    let envelope = match ServerEventEnvelope::parse(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Skipping malformed AI event");
            return Ok(());
        }
    };

    match RealtimeEvent::from(envelope) {
        RealtimeEvent::Loggable(event_type) => {
            info!(event_type = %event_type, payload = %text, "Received event");
        }
        RealtimeEvent::SessionUpdated => {
            info!(payload = %text, "Session updated successfully");
        }
        RealtimeEvent::AudioDelta(delta) if delta.is_empty() => {}
        RealtimeEvent::AudioDelta(delta) => {
            let payload = match reencode_audio(&delta) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable audio delta");
                    return Ok(());
                }
            };

            let event = TelephonyOutgoing::media(stream_id.get(), payload);
            let json = serde_json::to_string(&event)
                .map_err(|e| SessionError::Telephony(e.to_string()))?;
            telephony_tx
                .send(TelephonyMessage::Text(json.into()))
                .await
                .map_err(|e| SessionError::Telephony(e.to_string()))?;
        }
        RealtimeEvent::Other(event_type) => {
            trace!(event_type = %event_type, "Ignoring AI event");
        }
    }

    Ok(())
}
