//! Call session: one telephony media stream bridged to one AI connection.
//!
//! # Lifecycle
//!
//! 1. [`CallSession::open`] connects to the AI endpoint and sends the session
//!    configuration as the first message. A failure here fails the call.
//! 2. [`CallSession::run`] spawns the inbound relay (telephony -> AI) and the
//!    outbound relay (AI -> telephony) and waits for both.
//! 3. The AI connection is closed exactly once, by whichever side ends first
//!    or by `run` itself on exit.
//!
//! The telephony side ending closes the AI connection. The AI side ending
//! does not close the telephony socket: the inbound relay keeps reading and
//! drops audio until the caller hangs up.

mod inbound;
mod link;
mod outbound;
mod stream_id;

use std::pin::Pin;
use std::sync::Arc;

use axum::extract::ws::Message as TelephonyMessage;
use futures_util::{Sink, Stream};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::core::realtime::{
    ClientEvent, OpenAIRealtimeVoice, RealtimeConnection, RealtimeConnector, RealtimeError,
    RealtimeStream, SessionConfig,
};

pub use link::RealtimeLink;
pub use stream_id::StreamId;

/// Write half of the telephony websocket.
pub type TelephonySink = Pin<Box<dyn Sink<TelephonyMessage, Error = axum::Error> + Send>>;

/// Read half of the telephony websocket.
pub type TelephonyStream =
    Pin<Box<dyn Stream<Item = Result<TelephonyMessage, axum::Error>> + Send>>;

/// Errors that end a call session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The AI connection failed
    #[error("Realtime endpoint error: {0}")]
    Realtime(#[from] RealtimeError),

    /// Writing to the telephony socket failed
    #[error("Telephony websocket error: {0}")]
    Telephony(String),

    /// A relay task panicked or was cancelled
    #[error("Relay task failed: {0}")]
    TaskFailed(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Per-process settings applied to every call.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub voice: OpenAIRealtimeVoice,
    /// Instructions text, loaded once at startup
    pub instructions: Arc<str>,
}

impl SessionSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::for_call(self.voice, &self.instructions)
    }
}

/// A call whose AI connection is established and configured.
pub struct CallSession {
    call_id: String,
    link: Arc<RealtimeLink>,
    stream_id: Arc<StreamId>,
    realtime_rx: RealtimeStream,
}

impl CallSession {
    /// Connect to the AI endpoint and send the session configuration.
    pub async fn open(
        connector: &dyn RealtimeConnector,
        settings: &SessionSettings,
    ) -> SessionResult<Self> {
        let call_id = Uuid::new_v4().to_string();

        let RealtimeConnection { sink, stream } = connector.connect().await?;
        let link = Arc::new(RealtimeLink::new(sink));

        let update = ClientEvent::SessionUpdate {
            session: settings.session_config(),
        };
        if let Err(e) = link.send(&update).await {
            link.close().await;
            return Err(e.into());
        }
        info!(call_id = %call_id, endpoint = %connector.endpoint(), "Sent session update");

        Ok(Self {
            call_id,
            link,
            stream_id: Arc::new(StreamId::new()),
            realtime_rx: stream,
        })
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Shared handle to the AI connection.
    pub fn link(&self) -> Arc<RealtimeLink> {
        self.link.clone()
    }

    /// Run both relays until each has finished.
    ///
    /// Returns the first error in completion order; later errors are logged.
    pub async fn run(
        self,
        telephony_tx: TelephonySink,
        telephony_rx: TelephonyStream,
    ) -> SessionResult<()> {
        let Self {
            call_id,
            link,
            stream_id,
            realtime_rx,
        } = self;

        let span = info_span!(
            "call",
            call_id = %call_id,
            stream_sid = tracing::field::Empty,
            call_sid = tracing::field::Empty,
        );

        async move {
            let mut relays = JoinSet::new();
            relays.spawn(
                inbound::relay_inbound(telephony_rx, link.clone(), stream_id.clone())
                    .in_current_span(),
            );
            relays.spawn(
                outbound::relay_outbound(realtime_rx, telephony_tx, link.clone(), stream_id)
                    .in_current_span(),
            );

            let mut first_error = None;
            while let Some(joined) = relays.join_next().await {
                let result = joined
                    .map_err(|e| SessionError::TaskFailed(e.to_string()))
                    .and_then(|result| result);

                if let Err(e) = result {
                    if first_error.is_none() {
                        first_error = Some(e);
                    } else {
                        debug!(error = %e, "Relay also failed");
                    }
                }
            }

            link.close().await;
            info!("Call session ended");

            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
        .instrument(span)
        .await
    }

    /// Close the AI connection. Safe to call more than once.
    pub async fn close(&self) -> bool {
        self.link.close().await
    }
}

impl std::fmt::Debug for CallSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSession")
            .field("call_id", &self.call_id)
            .field("stream_id", &self.stream_id.get())
            .finish_non_exhaustive()
    }
}
