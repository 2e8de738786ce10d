pub mod api;
pub mod media_stream;

use axum::{Router, middleware};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::connection_limit_middleware;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Layer order on the media-stream route (outer to inner):
/// connection_limit -> handler.
pub fn create_app(state: Arc<AppState>) -> Router {
    let media_stream_routes =
        media_stream::create_media_stream_router().layer(middleware::from_fn_with_state(
            state.clone(),
            connection_limit_middleware,
        ));

    // Security headers
    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    api::create_api_router()
        .merge(media_stream_routes)
        .with_state(state)
        .layer(security_headers)
}
