//! End-to-end media stream tests
//!
//! Runs the real router on a local port, connects a telephony client over
//! websocket and points the relay at a mock realtime endpoint.

mod mock_providers;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, http::StatusCode},
};

use call_relay::{AppState, ServerConfig, routes};
use mock_providers::{MockEvent, RealtimeMock};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const KNOWLEDGE_TEXT: &str = "Opening hours are 9 to 5 on weekdays.";

fn test_config(realtime_url: String, knowledge_dir: &Path, max_calls: Option<usize>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        public_host: None,
        openai_api_key: "sk-test".to_string(),
        realtime_url,
        realtime_model: "gpt-4o-realtime-preview-2024-10-01".to_string(),
        voice: "alloy".to_string(),
        knowledge_dir: knowledge_dir.to_path_buf(),
        system_prompt: "Answer from this text:".to_string(),
        greeting: "Hello.".to_string(),
        max_concurrent_calls: max_calls,
        max_calls_per_ip: 10,
    }
}

struct TestServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    _knowledge: TempDir,
}

impl TestServer {
    async fn start(mock: &RealtimeMock, max_calls: Option<usize>) -> Self {
        let knowledge = TempDir::new().unwrap();
        std::fs::write(knowledge.path().join("faq.txt"), KNOWLEDGE_TEXT).unwrap();

        let config = test_config(mock.url(), knowledge.path(), max_calls);
        let state = AppState::from_config(config).unwrap();
        let app = routes::create_app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            addr,
            state,
            _knowledge: knowledge,
        }
    }

    fn media_stream_url(&self) -> String {
        format!("ws://{}/media-stream", self.addr)
    }

    async fn connect(&self) -> Client {
        let (client, _) = connect_async(self.media_stream_url()).await.unwrap();
        client
    }

    async fn wait_until_idle(&self) {
        timeout(Duration::from_secs(5), async {
            while self.state.ws_connection_count() != 0 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("call slot was not released");
    }
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn next_message(client: &mut Client) -> Message {
    timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(msg)) => return msg,
                other => panic!("telephony socket ended unexpectedly: {other:?}"),
            }
        }
    })
    .await
    .expect("timed out waiting for telephony message")
}

#[tokio::test]
async fn test_audio_round_trip_through_relay() {
    let mut mock = RealtimeMock::start().await;
    let server = TestServer::start(&mock, None).await;
    let mut client = server.connect().await;

    let update = mock.next_message().await;
    assert_eq!(update["type"], "session.update");
    assert_eq!(update["session"]["voice"], "alloy");
    assert_eq!(update["session"]["input_audio_format"], "g711_ulaw");
    let instructions = update["session"]["instructions"].as_str().unwrap();
    assert!(instructions.starts_with("Answer from this text:"));
    assert!(instructions.contains(KNOWLEDGE_TEXT));

    send_json(
        &mut client,
        json!({"event": "start", "start": {"streamSid": "MZ123", "callSid": "CA456"}}),
    )
    .await;
    send_json(
        &mut client,
        json!({"event": "media", "media": {"payload": "AAEC"}}),
    )
    .await;

    let append = mock.next_message().await;
    assert_eq!(append["type"], "input_audio_buffer.append");
    assert_eq!(append["audio"], "AAEC");

    let Message::Text(text) = next_message(&mut client).await else {
        panic!("expected a text frame");
    };
    let media: Value = serde_json::from_str(text.as_str()).unwrap();
    assert_eq!(
        media,
        json!({"event": "media", "streamSid": "MZ123", "media": {"payload": "AAEC"}})
    );

    let handshakes = mock.handshakes.lock().unwrap().clone();
    assert_eq!(handshakes.len(), 1);
    assert_eq!(handshakes[0].path, "/v1/realtime");
    assert_eq!(
        handshakes[0].query.as_deref(),
        Some("model=gpt-4o-realtime-preview-2024-10-01")
    );
    assert_eq!(handshakes[0].authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(handshakes[0].openai_beta.as_deref(), Some("realtime=v1"));

    client.close(None).await.unwrap();
    assert!(matches!(mock.next_event().await, MockEvent::Closed));
    server.wait_until_idle().await;
}

#[tokio::test]
async fn test_rejected_ai_handshake_closes_call_with_error() {
    let mock = RealtimeMock::rejecting(StatusCode::UNAUTHORIZED).await;
    let server = TestServer::start(&mock, None).await;
    let mut client = server.connect().await;

    match next_message(&mut client).await {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 1011),
        other => panic!("expected close frame, got {other:?}"),
    }

    server.wait_until_idle().await;
}

#[tokio::test]
async fn test_global_call_limit_rejects_upgrade() {
    let mut mock = RealtimeMock::start().await;
    let server = TestServer::start(&mock, Some(1)).await;

    let mut first = server.connect().await;
    assert_eq!(mock.next_message().await["type"], "session.update");
    assert_eq!(server.state.ws_connection_count(), 1);

    match connect_async(server.media_stream_url()).await {
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
        Ok(_) => panic!("second call should be refused"),
        Err(e) => panic!("unexpected error: {e}"),
    }

    first.close(None).await.unwrap();
    assert!(matches!(mock.next_event().await, MockEvent::Closed));
    server.wait_until_idle().await;

    let mut third = server.connect().await;
    assert_eq!(mock.next_message().await["type"], "session.update");
    third.close(None).await.unwrap();
}

#[tokio::test]
async fn test_plain_http_request_to_media_stream_is_rejected() {
    let mock = RealtimeMock::start().await;
    let server = TestServer::start(&mock, None).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /media-stream HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);

    assert!(response.starts_with("HTTP/1.1 4"), "got: {response}");
    assert_eq!(server.state.ws_connection_count(), 0);
}
