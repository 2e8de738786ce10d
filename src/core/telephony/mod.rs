//! Telephony media-stream side of a call.
//!
//! - `messages`: JSON events exchanged over the media-stream websocket
//! - `twiml`: call-control markup pointing the platform at the relay

pub mod messages;
pub mod twiml;

pub use messages::{MediaPayload, StartPayload, TelephonyEvent, TelephonyOutgoing};
pub use twiml::{MEDIA_STREAM_PATH, connect_stream_response, hostname_from_authority};
