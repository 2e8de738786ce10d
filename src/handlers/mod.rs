//! HTTP and WebSocket request handlers
//!
//! - `api` - Health check endpoint
//! - `incoming_call` - Call-control markup for new calls
//! - `media_stream` - Telephony media-stream WebSocket

pub mod api;
pub mod incoming_call;
pub mod media_stream;

// Re-export commonly used handlers for convenient access
pub use api::health_check;
pub use incoming_call::incoming_call_handler;
pub use media_stream::media_stream_handler;
