//! Incoming call webhook
//!
//! The telephony platform requests this endpoint when a call arrives. The
//! response greets the caller and points the platform at the media-stream
//! websocket of this server.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::telephony::{connect_stream_response, hostname_from_authority};
use crate::state::AppState;

/// Return call-control markup connecting the call to `/media-stream`.
///
/// The stream host is the configured public host, else the hostname from the
/// request's `Host` header. Responds 400 when neither is available.
pub async fn incoming_call_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let host = match state.config.public_host.as_deref() {
        Some(public_host) => Some(public_host.to_string()),
        None => headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .and_then(hostname_from_authority)
            .map(str::to_string),
    };

    let Some(host) = host else {
        warn!("Incoming call request without a usable Host header");
        return (StatusCode::BAD_REQUEST, "Missing Host header").into_response();
    };

    info!(host = %host, "Incoming call, connecting media stream");

    (
        [(header::CONTENT_TYPE, "application/xml")],
        connect_stream_response(&state.config.greeting, &host),
    )
        .into_response()
}
