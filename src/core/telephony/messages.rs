//! Telephony media-stream message types.
//!
//! Incoming events (platform -> relay):
//! - `start` - carries the stream identifier for the call
//! - `media` - one base64 u-law audio frame
//! - anything else (`connected`, `mark`, `dtmf`, `stop`, ...) is ignored
//!
//! Outgoing events (relay -> platform):
//! - `media` - one base64 audio frame tagged with the stream identifier

use serde::{Deserialize, Serialize};

// =============================================================================
// Incoming Events
// =============================================================================

/// Event received from the telephony platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyEvent {
    /// Stream started
    Start {
        /// Stream metadata
        start: StartPayload,
    },

    /// Inbound audio frame
    Media {
        /// Audio payload
        media: MediaPayload,
    },

    /// Any other event type
    #[serde(other)]
    Other,
}

impl TelephonyEvent {
    /// Parse a text frame from the telephony socket.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Body of a `start` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartPayload {
    /// Platform-assigned stream identifier
    #[serde(rename = "streamSid")]
    pub stream_sid: String,

    /// Platform-assigned call identifier
    #[serde(rename = "callSid", default)]
    pub call_sid: Option<String>,
}

/// Audio body shared by incoming and outgoing `media` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    /// Base64-encoded audio
    pub payload: String,
}

// =============================================================================
// Outgoing Events
// =============================================================================

/// Event sent to the telephony platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyOutgoing {
    /// Outbound audio frame
    Media {
        /// Stream identifier; serialized as `null` when no `start` was seen
        #[serde(rename = "streamSid")]
        stream_sid: Option<String>,
        /// Audio payload
        media: MediaPayload,
    },
}

impl TelephonyOutgoing {
    /// Build a media event for the given stream.
    pub fn media(stream_sid: Option<&str>, payload: impl Into<String>) -> Self {
        TelephonyOutgoing::Media {
            stream_sid: stream_sid.map(str::to_string),
            media: MediaPayload {
                payload: payload.into(),
            },
        }
    }
}
