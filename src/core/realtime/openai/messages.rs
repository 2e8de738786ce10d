//! OpenAI Realtime API WebSocket message types.
//!
//! Only the slice of the protocol the relay speaks is modelled here.
//!
//! Client events (sent to server):
//! - session.update - one-shot session configuration, first message on the socket
//! - input_audio_buffer.append - one per inbound telephony audio frame
//!
//! Server events are read through [`ServerEventEnvelope`], which keeps the
//! `type` discriminator and the optional `delta` audio payload and ignores
//! everything else. Classification happens in [`crate::core::realtime::events`].

use serde::{Deserialize, Serialize};

use super::config::{AudioFormat, Modality, OpenAIRealtimeVoice, SESSION_TEMPERATURE};

// =============================================================================
// Session Configuration
// =============================================================================

/// Session configuration sent once at the start of every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turn detection configuration
    pub turn_detection: TurnDetection,

    /// Input audio format
    pub input_audio_format: AudioFormat,

    /// Output audio format
    pub output_audio_format: AudioFormat,

    /// Voice for audio output
    pub voice: OpenAIRealtimeVoice,

    /// System instructions for the assistant
    pub instructions: String,

    /// Response modalities
    pub modalities: Vec<Modality>,

    /// Temperature for response generation
    pub temperature: f32,
}

impl SessionConfig {
    /// Build the configuration for one call.
    ///
    /// Everything except the voice and the instructions text is fixed: server
    /// VAD turn detection, G.711 u-law in both directions, text and audio
    /// output, temperature 0.8. Empty instructions are passed through as-is.
    pub fn for_call(voice: OpenAIRealtimeVoice, instructions: &str) -> Self {
        Self {
            turn_detection: TurnDetection::ServerVad,
            input_audio_format: AudioFormat::G711Ulaw,
            output_audio_format: AudioFormat::G711Ulaw,
            voice,
            instructions: instructions.to_string(),
            modalities: vec![Modality::Text, Modality::Audio],
            temperature: SESSION_TEMPERATURE,
        }
    }
}

/// Turn detection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurnDetection {
    /// Server-side VAD
    #[serde(rename = "server_vad")]
    ServerVad,
}

// =============================================================================
// Client Events (sent to server)
// =============================================================================

/// Client events sent to the OpenAI Realtime API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Update session configuration
    #[serde(rename = "session.update")]
    SessionUpdate {
        /// Session configuration
        session: SessionConfig,
    },

    /// Append audio to input buffer
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend {
        /// Base64-encoded audio data
        audio: String,
    },
}

impl ClientEvent {
    /// Wrap an already base64-encoded telephony payload, unchanged.
    pub fn audio_append(payload: impl Into<String>) -> Self {
        ClientEvent::InputAudioBufferAppend {
            audio: payload.into(),
        }
    }
}

// =============================================================================
// Server Events (received from server)
// =============================================================================

/// The part of a server event the relay cares about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerEventEnvelope {
    /// Event type discriminator
    #[serde(rename = "type")]
    pub event_type: String,

    /// Base64-encoded audio chunk (present on `response.audio.delta`)
    #[serde(default)]
    pub delta: Option<String>,
}

impl ServerEventEnvelope {
    /// Parse a text frame from the server.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_session_update_wire_format() {
        let event = ClientEvent::SessionUpdate {
            session: SessionConfig::for_call(OpenAIRealtimeVoice::Alloy, "Be brief."),
        };

        // Round-trip through text so f32 temperature is compared as printed.
        let text = serde_json::to_string(&event).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "session.update",
                "session": {
                    "turn_detection": {"type": "server_vad"},
                    "input_audio_format": "g711_ulaw",
                    "output_audio_format": "g711_ulaw",
                    "voice": "alloy",
                    "instructions": "Be brief.",
                    "modalities": ["text", "audio"],
                    "temperature": 0.8
                }
            })
        );
    }

    #[test]
    fn test_session_config_accepts_empty_instructions() {
        let config = SessionConfig::for_call(OpenAIRealtimeVoice::Echo, "");
        assert_eq!(config.instructions, "");
        assert_eq!(config.voice, OpenAIRealtimeVoice::Echo);
        assert_eq!(config.turn_detection, TurnDetection::ServerVad);
    }

    #[test]
    fn test_session_config_is_deterministic() {
        let a = SessionConfig::for_call(OpenAIRealtimeVoice::Sage, "same text");
        let b = SessionConfig::for_call(OpenAIRealtimeVoice::Sage, "same text");
        assert_eq!(a, b);
    }

    #[test]
    fn test_audio_append_keeps_payload() {
        let event = ClientEvent::audio_append("f39/fw==");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"type": "input_audio_buffer.append", "audio": "f39/fw=="})
        );
    }

    #[test]
    fn test_envelope_parses_delta() {
        let envelope = ServerEventEnvelope::parse(
            r#"{"type":"response.audio.delta","response_id":"r1","delta":"AAEC"}"#,
        )
        .unwrap();
        assert_eq!(envelope.event_type, "response.audio.delta");
        assert_eq!(envelope.delta.as_deref(), Some("AAEC"));
    }

    #[test]
    fn test_envelope_without_delta() {
        let envelope =
            ServerEventEnvelope::parse(r#"{"type":"session.created","session":{"id":"s"}}"#)
                .unwrap();
        assert_eq!(envelope.event_type, "session.created");
        assert!(envelope.delta.is_none());
    }

    #[test]
    fn test_envelope_requires_type() {
        assert!(ServerEventEnvelope::parse(r#"{"delta":"AAEC"}"#).is_err());
        assert!(ServerEventEnvelope::parse("not json").is_err());
    }
}
