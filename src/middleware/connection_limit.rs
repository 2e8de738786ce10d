//! Admission control for media-stream connections
//!
//! Enforces two limits on websocket upgrades:
//! - Global maximum number of concurrent calls
//! - Per-IP maximum number of concurrent calls
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use call_relay::middleware::connection_limit_middleware;
//!
//! let app = Router::new()
//!     .route("/media-stream", get(media_stream_handler))
//!     .layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         connection_limit_middleware,
//!     ));
//! ```

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

use crate::state::{AppState, ConnectionLimitError};

/// Client IP of an admitted call, carried to the handler so it can release
/// the slot when the call ends.
#[derive(Clone, Debug)]
pub struct ClientIp(pub IpAddr);

impl IntoResponse for ConnectionLimitError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ConnectionLimitError::GlobalLimitReached => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Server at capacity. Please try again later.",
            ),
            ConnectionLimitError::PerIpLimitReached => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many connections from your IP address.",
            ),
        };
        (status, body).into_response()
    }
}

fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("websocket"))
}

/// Admit a call before its websocket upgrade.
///
/// A refused call gets 503 (global limit) or 429 (per-IP limit) and never
/// reaches the handler. Plain HTTP requests are not counted.
pub async fn connection_limit_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !is_websocket_upgrade(request.headers()) {
        return next.run(request).await;
    }

    let ip = addr.ip();
    if let Err(refusal) = state.try_acquire_connection(ip) {
        warn!(
            ip = %ip,
            active_calls = state.ws_connection_count(),
            reason = %refusal,
            "Refusing call"
        );
        return refusal.into_response();
    }

    // The handler owns the slot from here and releases it when the call ends
    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}
