//! Media-stream WebSocket handler
//!
//! Each accepted websocket is one phone call. The handler opens the AI
//! connection for the call, then hands both sockets to a [`CallSession`]
//! that relays audio until the call ends.

use axum::{
    Extension,
    extract::{
        State,
        ws::{
            CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::session::CallSession;
use crate::middleware::ClientIp;
use crate::state::AppState;

/// Maximum WebSocket frame size (1 MB)
const MAX_WS_FRAME_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size (1 MB)
const MAX_WS_MESSAGE_SIZE: usize = 1024 * 1024;

/// Admission slot held for the lifetime of a call.
struct CallSlot {
    state: Arc<AppState>,
    ip: IpAddr,
}

impl Drop for CallSlot {
    fn drop(&mut self) {
        self.state.release_connection(self.ip);
        debug!(ip = %self.ip, "Released call slot");
    }
}

/// Media-stream WebSocket handler
///
/// Upgrades the connection and runs one call session on it. The admission
/// slot reserved by the connection-limit middleware is released when the
/// session ends or when the upgrade fails.
pub async fn media_stream_handler(
    State(state): State<Arc<AppState>>,
    client_ip: Option<Extension<ClientIp>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let slot = client_ip.map(|Extension(ClientIp(ip))| CallSlot {
        state: state.clone(),
        ip,
    });

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected media stream upgrade");
            return rejection.into_response();
        }
    };

    info!("Media stream connection upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| async move {
            let _slot = slot;
            handle_media_stream(socket, state).await;
        })
}

async fn handle_media_stream(mut socket: WebSocket, state: Arc<AppState>) {
    info!("Client connected");

    let session =
        match CallSession::open(state.connector.as_ref(), &state.session_settings).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Failed to open AI connection, ending call");
                let frame = CloseFrame {
                    code: close_code::ERROR,
                    reason: Utf8Bytes::from_static("AI endpoint unavailable"),
                };
                if let Err(e) = socket.send(Message::Close(Some(frame))).await {
                    debug!(error = %e, "Telephony socket already closed");
                }
                return;
            }
        };

    let call_id = session.call_id().to_string();
    let (sender, receiver) = socket.split();

    match session.run(Box::pin(sender), Box::pin(receiver)).await {
        Ok(()) => info!(call_id = %call_id, "Call ended"),
        Err(e) => warn!(call_id = %call_id, error = %e, "Call ended with error"),
    }
}
