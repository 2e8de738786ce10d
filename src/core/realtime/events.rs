//! Classification of events arriving from the realtime AI endpoint.
//!
//! The outbound relay only acts on two event types. A fixed set of others
//! is logged for diagnostics, and everything else is ignored.

use super::openai::ServerEventEnvelope;

/// Event type confirming the session configuration was applied.
pub const SESSION_UPDATED: &str = "session.updated";

/// Event type carrying a chunk of synthesized audio.
pub const AUDIO_DELTA: &str = "response.audio.delta";

/// Event types that are logged but otherwise have no effect.
pub const DIAGNOSTIC_EVENT_TYPES: [&str; 7] = [
    "response.content.done",
    "rate_limits.updated",
    "response.done",
    "input_audio_buffer.committed",
    "input_audio_buffer.speech_stopped",
    "input_audio_buffer.speech_started",
    "session.created",
];

/// How the outbound relay treats an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Emit a diagnostic log line only
    Diagnostic,
    /// Emit a session confirmation log line only
    SessionUpdated,
    /// Forward the audio payload to the telephony side
    ForwardAudio,
    /// Drop silently
    Ignore,
}

/// Look up the disposition for an event type.
pub fn classify(event_type: &str) -> EventDisposition {
    match event_type {
        SESSION_UPDATED => EventDisposition::SessionUpdated,
        AUDIO_DELTA => EventDisposition::ForwardAudio,
        t if DIAGNOSTIC_EVENT_TYPES.contains(&t) => EventDisposition::Diagnostic,
        _ => EventDisposition::Ignore,
    }
}

/// A classified event from the AI endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    SessionUpdated,
    /// Audio chunk; the payload may be empty when the server omitted it.
    AudioDelta(String),
    Loggable(String),
    Other(String),
}

impl From<ServerEventEnvelope> for RealtimeEvent {
    fn from(envelope: ServerEventEnvelope) -> Self {
        match classify(&envelope.event_type) {
            EventDisposition::SessionUpdated => RealtimeEvent::SessionUpdated,
            EventDisposition::ForwardAudio => {
                RealtimeEvent::AudioDelta(envelope.delta.unwrap_or_default())
            }
            EventDisposition::Diagnostic => RealtimeEvent::Loggable(envelope.event_type),
            EventDisposition::Ignore => RealtimeEvent::Other(envelope.event_type),
        }
    }
}
