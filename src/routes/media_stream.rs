//! Media-stream WebSocket route configuration

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::core::telephony::MEDIA_STREAM_PATH;
use crate::handlers::media_stream::media_stream_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the media-stream WebSocket router
///
/// # Endpoint
///
/// `GET /media-stream` - WebSocket upgrade opened by the telephony platform
///
/// # Protocol
///
/// The platform sends JSON events (`connected`, `start`, `media`, `stop`).
/// The server answers with `media` events carrying synthesized audio:
///
/// ```json
/// {"event": "media", "streamSid": "MZ...", "media": {"payload": "<base64 u-law>"}}
/// ```
pub fn create_media_stream_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(MEDIA_STREAM_PATH, get(media_stream_handler))
        .layer(TraceLayer::new_for_http())
}
