//! Telephony -> AI direction of a call.

use std::sync::Arc;

use axum::extract::ws::Message;
use futures_util::StreamExt;
use tracing::{Span, info, trace, warn};

use super::{RealtimeLink, SessionResult, StreamId, TelephonyStream};
use crate::core::realtime::ClientEvent;
use crate::core::telephony::TelephonyEvent;

/// Relay telephony events to the AI connection until the telephony side ends.
///
/// Always closes the AI connection on exit, whatever the reason.
pub(super) async fn relay_inbound(
    mut telephony_rx: TelephonyStream,
    link: Arc<RealtimeLink>,
    stream_id: Arc<StreamId>,
) -> SessionResult<()> {
    let result = forward_telephony_events(&mut telephony_rx, &link, &stream_id).await;

    if link.close().await {
        info!("Closed AI connection after telephony stream ended");
    }
    result
}

async fn forward_telephony_events(
    telephony_rx: &mut TelephonyStream,
    link: &RealtimeLink,
    stream_id: &StreamId,
) -> SessionResult<()> {
    while let Some(frame) = telephony_rx.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(frame)) => {
                info!(?frame, "Telephony client disconnected");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "Telephony websocket error");
                break;
            }
        };

        match TelephonyEvent::parse(text.as_str()) {
            Ok(TelephonyEvent::Media { media }) => {
                if !link.send(&ClientEvent::audio_append(media.payload)).await? {
                    trace!("AI connection closed, dropping inbound audio frame");
                }
            }
            Ok(TelephonyEvent::Start { start }) => {
                if stream_id.latch(&start.stream_sid) {
                    let span = Span::current();
                    span.record("stream_sid", start.stream_sid.as_str());
                    if let Some(call_sid) = start.call_sid.as_deref() {
                        span.record("call_sid", call_sid);
                    }
                    info!(
                        stream_sid = %start.stream_sid,
                        call_sid = start.call_sid.as_deref().unwrap_or("-"),
                        "Incoming stream has started"
                    );
                }
            }
            Ok(TelephonyEvent::Other) => {}
            Err(e) => warn!(error = %e, "Skipping malformed telephony event"),
        }
    }

    Ok(())
}
