//! Realtime conversational-AI provider module.
//!
//! # Architecture
//!
//! - `RealtimeConnector` trait opens one AI connection per call
//! - `openai` holds the OpenAI Realtime implementation and wire messages
//! - `events` classifies server events for the outbound relay
//!
//! # Example
//!
//! ```rust,ignore
//! use call_relay::core::realtime::{OpenAIRealtime, RealtimeConfig, RealtimeConnector};
//!
//! let connector = OpenAIRealtime::new(RealtimeConfig {
//!     api_key: "sk-...".to_string(),
//!     model: "gpt-4o-realtime-preview-2024-10-01".to_string(),
//!     ..Default::default()
//! })?;
//! let connection = connector.connect().await?;
//! ```

mod base;
pub mod events;
pub mod openai;

pub use base::{
    RealtimeConfig, RealtimeConnection, RealtimeConnector, RealtimeError, RealtimeResult,
    RealtimeSink, RealtimeStream,
};
pub use events::{DIAGNOSTIC_EVENT_TYPES, EventDisposition, RealtimeEvent, classify};
pub use openai::{
    ClientEvent, DEFAULT_REALTIME_MODEL, OPENAI_REALTIME_URL, OpenAIRealtime, OpenAIRealtimeVoice,
    ServerEventEnvelope, SessionConfig,
};
