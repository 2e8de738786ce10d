use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, incoming_call};
use crate::state::AppState;
use std::sync::Arc;

/// Create the HTTP router
///
/// - `GET /` - health check
/// - `GET|POST /incoming-call` - call-control markup for the telephony platform
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route(
            "/incoming-call",
            get(incoming_call::incoming_call_handler).post(incoming_call::incoming_call_handler),
        )
        .layer(TraceLayer::new_for_http())
}
