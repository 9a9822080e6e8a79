/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for coinbasepro-adapter tests

#![allow(dead_code)]

use std::time::Duration;

use coinbasepro_adapter::{ClientConfig, CoinbaseClient, Credentials};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

/// base64("secret")
pub const TEST_SECRET: &str = "c2VjcmV0";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-key", "test-passphrase", TEST_SECRET).expect("valid test credentials")
}

/// Config pointing REST at `server` with a 1 ms backoff unit
pub fn mock_config(server: &MockServer, retry_count: u32) -> ClientConfig {
    ClientConfig::default()
        .with_base_urls(server.uri(), "ws://127.0.0.1:1")
        .with_retry_count(retry_count)
        .with_retry_interval(Duration::from_millis(1))
}

pub fn anonymous_client(server: &MockServer, retry_count: u32) -> CoinbaseClient {
    CoinbaseClient::with_config(mock_config(server, retry_count)).expect("client should build")
}

pub fn authenticated_client(server: &MockServer) -> CoinbaseClient {
    CoinbaseClient::authenticated(test_credentials(), mock_config(server, 0))
        .expect("client should build")
}

pub fn feed_client(feed_url: &str) -> CoinbaseClient {
    let config = ClientConfig::default().with_base_urls("http://127.0.0.1:1", feed_url);
    CoinbaseClient::with_config(config).expect("client should build")
}

pub fn heartbeat_frame(sequence: i64) -> Message {
    let frame = serde_json::json!({
        "type": "heartbeat",
        "sequence": sequence,
        "last_trade_id": 20,
        "product_id": "BTC-USD",
        "time": "2014-11-07T08:19:28.464459Z"
    });
    Message::Text(frame.to_string().into())
}

/// What the mock feed saw from the client
#[derive(Debug)]
pub struct FeedObservation {
    pub subscription: Option<Value>,
    pub client_closed: bool,
}

/// Single-connection feed server on an ephemeral port
pub struct FeedServer {
    pub url: String,
    handle: JoinHandle<FeedObservation>,
}

impl FeedServer {
    /// Accept one client, read its control message, push `frames`, then
    /// optionally close from the server side and wait for the client to go away
    pub async fn spawn(frames: Vec<Message>, close_after: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("ws://127.0.0.1:{}/", port);

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            let subscription = match ws.next().await {
                Some(Ok(Message::Text(text))) => serde_json::from_str(&text).ok(),
                _ => None,
            };

            for frame in frames {
                if ws.send(frame).await.is_err() {
                    break;
                }
            }
            if close_after {
                let _ = ws.close(None).await;
            }

            let mut client_closed = false;
            while let Some(message) = ws.next().await {
                match message {
                    Ok(Message::Close(_)) => {
                        client_closed = true;
                        break;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }

            FeedObservation {
                subscription,
                client_closed,
            }
        });

        Self { url, handle }
    }

    pub async fn finish(self) -> FeedObservation {
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("feed server should finish")
            .expect("feed server task should not panic")
    }
}
