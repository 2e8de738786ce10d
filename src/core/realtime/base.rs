//! Base traits and types for the realtime conversational-AI side of a call.
//!
//! The relay only needs two things from the AI endpoint: a write half that
//! accepts websocket frames and a read half that yields them. Everything
//! provider-specific (URL layout, authentication headers) lives behind the
//! [`RealtimeConnector`] trait so call sessions can be driven by an in-memory
//! connection in tests.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Sink, Stream};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_tungstenite::tungstenite::{self, Message};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while talking to the realtime AI endpoint.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Not connected
    #[error("Not connected")]
    NotConnected,
}

/// Result type for realtime operations.
pub type RealtimeResult<T> = Result<T, RealtimeError>;

// =============================================================================
// Configuration Types
// =============================================================================

/// Connection settings for a realtime provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base websocket URL of the endpoint (without query string)
    #[serde(default)]
    pub url: String,

    /// Model to use (e.g., "gpt-4o-realtime-preview-2024-10-01")
    #[serde(default)]
    pub model: String,
}

// =============================================================================
// Connection halves
// =============================================================================

/// Write half of an AI connection.
pub type RealtimeSink = Pin<Box<dyn Sink<Message, Error = tungstenite::Error> + Send>>;

/// Read half of an AI connection.
pub type RealtimeStream = Pin<Box<dyn Stream<Item = Result<Message, tungstenite::Error>> + Send>>;

/// An established connection to the realtime AI endpoint.
pub struct RealtimeConnection {
    pub sink: RealtimeSink,
    pub stream: RealtimeStream,
}

impl RealtimeConnection {
    pub fn new(sink: RealtimeSink, stream: RealtimeStream) -> Self {
        Self { sink, stream }
    }
}

impl std::fmt::Debug for RealtimeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeConnection").finish_non_exhaustive()
    }
}

// =============================================================================
// Connector trait
// =============================================================================

/// Opens connections to a realtime AI endpoint.
///
/// One connection is opened per call. Implementations must not retry: a
/// failed handshake is reported to the caller, which fails the call.
#[async_trait]
pub trait RealtimeConnector: Send + Sync {
    /// Establish a new authenticated connection.
    async fn connect(&self) -> RealtimeResult<RealtimeConnection>;

    /// Human-readable endpoint description used in logs.
    fn endpoint(&self) -> String;
}
