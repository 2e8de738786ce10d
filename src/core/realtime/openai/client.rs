//! OpenAI Realtime API connector.
//!
//! # API Reference
//!
//! - Endpoint: `wss://api.openai.com/v1/realtime?model=<model>`
//! - Protocol: WebSocket with JSON events
//! - Auth: `Authorization: Bearer <key>` plus `OpenAI-Beta: realtime=v1`
//!
//! # Example
//!
//! ```rust,ignore
//! use call_relay::core::realtime::{OpenAIRealtime, RealtimeConfig, RealtimeConnector};
//!
//! let connector = OpenAIRealtime::new(RealtimeConfig {
//!     api_key: "sk-...".to_string(),
//!     ..Default::default()
//! })?;
//! let connection = connector.connect().await?;
//! ```

use async_trait::async_trait;
use futures_util::StreamExt;
use http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use tokio_tungstenite::tungstenite::{self, client::IntoClientRequest};

use super::config::{DEFAULT_REALTIME_MODEL, OPENAI_BETA_HEADER_VALUE, OPENAI_REALTIME_URL};
use crate::core::realtime::base::{
    RealtimeConfig, RealtimeConnection, RealtimeConnector, RealtimeError, RealtimeResult,
};

/// OpenAI Realtime API connector.
///
/// Holds the credential and endpoint; every [`RealtimeConnector::connect`]
/// call performs a fresh websocket handshake. There is no reconnection: a
/// dropped AI connection ends its call.
pub struct OpenAIRealtime {
    config: RealtimeConfig,
}

impl OpenAIRealtime {
    /// Create a connector, validating the credential up front.
    pub fn new(config: RealtimeConfig) -> RealtimeResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RealtimeError::AuthenticationFailed(
                "API key is required".to_string(),
            ));
        }

        Ok(Self { config })
    }

    /// Model requested in the handshake.
    fn model(&self) -> &str {
        match self.config.model.trim() {
            "" => DEFAULT_REALTIME_MODEL,
            model => model,
        }
    }

    /// Build the WebSocket URL with model parameter.
    fn build_ws_url(&self) -> String {
        let base = if self.config.url.is_empty() {
            OPENAI_REALTIME_URL
        } else {
            self.config.url.trim_end_matches('?')
        };
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}model={}", base, separator, self.model())
    }

    /// Build the handshake request carrying the authentication headers.
    fn build_request(&self) -> RealtimeResult<http::Request<()>> {
        let mut request = self
            .build_ws_url()
            .into_client_request()
            .map_err(|e| RealtimeError::InvalidConfiguration(e.to_string()))?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|e| RealtimeError::InvalidConfiguration(e.to_string()))?;
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "openai-beta",
            HeaderValue::from_static(OPENAI_BETA_HEADER_VALUE),
        );

        Ok(request)
    }
}

/// Map a handshake failure onto the session-fatal error taxonomy.
fn map_handshake_error(error: tungstenite::Error) -> RealtimeError {
    match error {
        tungstenite::Error::Http(response)
            if matches!(
                response.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            ) =>
        {
            RealtimeError::AuthenticationFailed(format!("HTTP {}", response.status()))
        }
        other => RealtimeError::ConnectionFailed(other.to_string()),
    }
}

#[async_trait]
impl RealtimeConnector for OpenAIRealtime {
    async fn connect(&self) -> RealtimeResult<RealtimeConnection> {
        let request = self.build_request()?;

        let (ws_stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(map_handshake_error)?;

        tracing::info!(model = %self.model(), "Connected to OpenAI Realtime API");

        let (ws_sink, ws_stream) = ws_stream.split();
        Ok(RealtimeConnection::new(Box::pin(ws_sink), Box::pin(ws_stream)))
    }

    fn endpoint(&self) -> String {
        self.build_ws_url()
    }
}

// =============================================================================
// Tests
// =============================================================================
