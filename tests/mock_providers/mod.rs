//! Mock realtime AI endpoint
//!
//! A local websocket server that speaks the slice of the realtime protocol
//! the relay uses:
//! - records the handshake (path, query, auth headers)
//! - answers `session.update` with `session.created` + `session.updated`
//! - echoes every `input_audio_buffer.append` back as a `response.audio.delta`
//!
//! It can also refuse the handshake with an HTTP status to simulate bad
//! credentials.

// Not every test binary uses every helper
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        Message,
        handshake::server::{ErrorResponse, Request, Response},
        http::StatusCode,
    },
};

/// What the mock saw during a websocket handshake.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub openai_beta: Option<String>,
}

/// Something the mock observed on a connection.
#[derive(Debug, Clone)]
pub enum MockEvent {
    /// JSON message received from the relay
    Received(Value),
    /// The relay closed the connection
    Closed,
}

pub struct RealtimeMock {
    pub port: u16,
    pub handshakes: Arc<Mutex<Vec<Handshake>>>,
    pub events: mpsc::UnboundedReceiver<MockEvent>,
}

impl RealtimeMock {
    /// Start a mock that accepts every handshake.
    pub async fn start() -> Self {
        Self::spawn(None).await
    }

    /// Start a mock that refuses every handshake with `status`.
    pub async fn rejecting(status: StatusCode) -> Self {
        Self::spawn(Some(status)).await
    }

    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}/v1/realtime", self.port)
    }

    /// Wait for the next observed event.
    pub async fn next_event(&mut self) -> MockEvent {
        tokio::time::timeout(Duration::from_secs(5), self.events.recv())
            .await
            .expect("timed out waiting for mock realtime event")
            .expect("mock realtime server stopped")
    }

    /// Wait for the next JSON message from the relay.
    pub async fn next_message(&mut self) -> Value {
        match self.next_event().await {
            MockEvent::Received(value) => value,
            MockEvent::Closed => panic!("connection closed while waiting for a message"),
        }
    }

    async fn spawn(reject_with: Option<StatusCode>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handshakes = Arc::new(Mutex::new(Vec::new()));
        let (events_tx, events) = mpsc::unbounded_channel();

        let recorded = handshakes.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();
                let events_tx = events_tx.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, recorded, events_tx, reject_with).await;
                });
            }
        });

        Self {
            port,
            handshakes,
            events,
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    handshakes: Arc<Mutex<Vec<Handshake>>>,
    events: mpsc::UnboundedSender<MockEvent>,
    reject_with: Option<StatusCode>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let callback = |request: &Request, response: Response| {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        handshakes.lock().unwrap().push(Handshake {
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header("authorization"),
            openai_beta: header("openai-beta"),
        });

        match reject_with {
            Some(status) => {
                let mut error = ErrorResponse::new(Some("rejected by mock".to_string()));
                *error.status_mut() = status;
                Err(error)
            }
            None => Ok(response),
        }
    };

    let ws_stream = accept_hdr_async(stream, callback).await?;
    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        let value: Value = serde_json::from_str(text.as_str())?;
        let _ = events.send(MockEvent::Received(value.clone()));

        match value["type"].as_str() {
            Some("session.update") => {
                let created = json!({"type": "session.created", "session": {"id": "sess_mock"}});
                let updated = json!({"type": "session.updated", "session": value["session"]});
                write.send(Message::Text(created.to_string().into())).await?;
                write.send(Message::Text(updated.to_string().into())).await?;
            }
            Some("input_audio_buffer.append") => {
                let delta = json!({
                    "type": "response.audio.delta",
                    "response_id": "resp_mock",
                    "item_id": "item_mock",
                    "output_index": 0,
                    "content_index": 0,
                    "delta": value["audio"],
                });
                write.send(Message::Text(delta.to_string().into())).await?;
            }
            _ => {}
        }
    }

    let _ = events.send(MockEvent::Closed);
    Ok(())
}
