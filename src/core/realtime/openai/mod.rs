//! OpenAI Realtime API module.
//!
//! Connects a call to OpenAI's Realtime API and defines the wire messages the
//! relay exchanges with it.
//!
//! # Models
//!
//! `gpt-4o-realtime-preview-2024-10-01` unless configured otherwise. The
//! configured name is sent as-is in the `model` query parameter.
//!
//! # Supported Voices
//!
//! alloy, ash, ballad, coral, echo, sage, shimmer, verse
//!
//! # Audio Format
//!
//! G.711 u-law at 8kHz in both directions, matching telephony media streams.

mod client;
mod config;
mod messages;

pub use client::OpenAIRealtime;
pub use config::{
    AudioFormat, DEFAULT_REALTIME_MODEL, Modality, OPENAI_BETA_HEADER_VALUE, OPENAI_REALTIME_URL,
    OpenAIRealtimeVoice, SESSION_TEMPERATURE,
};
pub use messages::{ClientEvent, ServerEventEnvelope, SessionConfig, TurnDetection};
