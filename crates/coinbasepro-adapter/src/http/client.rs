/*
[INPUT]:  ClientConfig (URLs, retry policy, clock offset, timeouts) and optional credentials
[OUTPUT]: Signed, retried HTTP calls with typed decoding and response metadata
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing retry/decoding behavior
*/

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::http::error::ApiErrorBody;
use crate::http::{CoinbaseError, RequestSigner, Result};

pub const BASE_URL_PRODUCTION: &str = "https://api.exchange.coinbase.com";
pub const BASE_URL_SANDBOX: &str = "https://api-public.sandbox.exchange.coinbase.com";
pub const WEBSOCKET_URL_PRODUCTION: &str = "wss://ws-feed.exchange.coinbase.com";
pub const WEBSOCKET_URL_SANDBOX: &str = "wss://ws-feed-public.sandbox.exchange.coinbase.com";

pub const HEADER_BEFORE: &str = "cb-before";
pub const HEADER_AFTER: &str = "cb-after";

const DEFAULT_USER_AGENT: &str = concat!("coinbasepro-adapter/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
///
/// Built once and handed to [`CoinbaseClient`]; the client never mutates it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub websocket_url: String,
    /// Extra attempts after the first one when the server answers 429
    pub retry_count: u32,
    /// Base unit of the backoff schedule
    pub retry_interval: Duration,
    /// Added to the local clock when producing signing timestamps
    pub time_offset_seconds: i64,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL_PRODUCTION.to_string(),
            websocket_url: WEBSOCKET_URL_PRODUCTION.to_string(),
            retry_count: 0,
            retry_interval: Duration::from_millis(100),
            time_offset_seconds: 0,
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Point both REST and feed URLs at the sandbox environment
    pub fn sandbox(mut self) -> Self {
        self.base_url = BASE_URL_SANDBOX.to_string();
        self.websocket_url = WEBSOCKET_URL_SANDBOX.to_string();
        self
    }

    /// Override both endpoints, e.g. for a local mock server
    pub fn with_base_urls(mut self, base_url: impl Into<String>, websocket_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.websocket_url = websocket_url.into();
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Compensate for clock skew against the exchange (the sandbox clock has drifted before)
    pub fn with_time_offset(mut self, seconds: i64) -> Self {
        self.time_offset_seconds = seconds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Delay inserted before attempt `attempt` (zero-based)
///
/// `((2^attempt - 1) / 2) * interval`: 0, 0.5, 1.5, 3.5, ... intervals.
pub fn backoff_delay(attempt: u32, interval: Duration) -> Duration {
    let multiplier = (1u128 << attempt.min(63)) - 1;
    let nanos = interval.as_nanos().saturating_mul(multiplier) / 2;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// One logical API call: method, path (with query) and serialized body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

impl RequestEnvelope {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Attach a JSON body, serialized once for all attempts
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_string(body).map_err(CoinbaseError::Encode)?;
        self.body = Some(encoded);
        Ok(self)
    }

    fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Status and headers of the final response of a call
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Number of attempts the call took
    pub attempts: u32,
}

impl ResponseMeta {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
    }

    /// Continuation token for the page before this one
    pub fn before(&self) -> Option<&str> {
        self.header(HEADER_BEFORE)
    }

    /// Continuation token for the page after this one
    pub fn after(&self) -> Option<&str> {
        self.header(HEADER_AFTER)
    }
}

/// Main HTTP client for the Coinbase Pro REST API
///
/// Immutable after construction; share it by reference or behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    http_client: Client,
    base_url: Url,
    websocket_url: Url,
    config: ClientConfig,
    signer: Option<RequestSigner>,
}

impl CoinbaseClient {
    /// Create an anonymous client for public endpoints
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create an anonymous client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = build_http_client(&config)?;
        Self::with_http_client(config, None, http_client)
    }

    /// Create a client that signs every request with `credentials`
    pub fn authenticated(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http_client = build_http_client(&config)?;
        Self::with_http_client(config, Some(credentials), http_client)
    }

    /// Create a client around a preconfigured reqwest client
    pub fn with_http_client(
        config: ClientConfig,
        credentials: Option<Credentials>,
        http_client: Client,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let websocket_url = Url::parse(&config.websocket_url)?;

        Ok(Self {
            http_client,
            base_url,
            websocket_url,
            config,
            signer: credentials.map(RequestSigner::new),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.signer.as_ref().map(RequestSigner::credentials)
    }

    pub(crate) fn signer(&self) -> Option<&RequestSigner> {
        self.signer.as_ref()
    }

    pub(crate) fn websocket_url(&self) -> &Url {
        &self.websocket_url
    }

    /// Unix seconds adjusted by the configured clock offset
    pub fn timestamp(&self) -> i64 {
        Utc::now().timestamp() + self.config.time_offset_seconds
    }

    /// Execute a call and decode a 200 body into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        envelope: &RequestEnvelope,
    ) -> Result<T> {
        let (_, value) = self.execute(cancel, envelope).await?;
        Ok(value)
    }

    /// Execute a call, returning response metadata alongside the decoded body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        envelope: &RequestEnvelope,
    ) -> Result<(ResponseMeta, T)> {
        let (meta, body) = self.execute_raw(cancel, envelope).await?;
        let value = serde_json::from_str(&body).map_err(|e| {
            CoinbaseError::decode(format!("{} {} response", envelope.method, envelope.path), e)
        })?;
        Ok((meta, value))
    }

    /// Execute a call whose success body is not needed
    pub async fn execute_discard(
        &self,
        cancel: &CancellationToken,
        envelope: &RequestEnvelope,
    ) -> Result<ResponseMeta> {
        let (meta, _) = self.execute_raw(cancel, envelope).await?;
        Ok(meta)
    }

    /// Retry loop: only 429 is retried, everything else ends the call
    async fn execute_raw(
        &self,
        cancel: &CancellationToken,
        envelope: &RequestEnvelope,
    ) -> Result<(ResponseMeta, String)> {
        let url = self.endpoint_url(&envelope.path)?;
        let max_attempts = self.config.retry_count.saturating_add(1);
        let mut attempt = 0;

        let (status, headers, body) = loop {
            let delay = backoff_delay(attempt, self.config.retry_interval);
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
                response = self.send_once(url.clone(), envelope) => response?,
            };

            let status = response.status();
            let headers = response.headers().clone();
            attempt += 1;
            debug!(
                method = %envelope.method,
                path = %envelope.path,
                attempt,
                status = status.as_u16(),
                "http attempt finished"
            );

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < max_attempts {
                warn!(
                    method = %envelope.method,
                    path = %envelope.path,
                    attempt,
                    max_attempts,
                    "rate limited, backing off"
                );
                continue;
            }

            let body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
                body = response.text() => body?,
            };
            break (status, headers, body);
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(CoinbaseError::RateLimit {
                attempts: attempt,
                message,
                headers,
            });
        }

        if status != StatusCode::OK {
            let err: ApiErrorBody = serde_json::from_str(&body)
                .map_err(|e| CoinbaseError::decode("error response", e))?;
            return Err(CoinbaseError::api_error(status, err.message).with_headers(headers));
        }

        let meta = ResponseMeta {
            status,
            headers,
            attempts: attempt,
        };
        Ok((meta, body))
    }

    /// Base URL and path are concatenated so a base path prefix survives
    fn endpoint_url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Path and query as the server will see them, relative to the base URL
    ///
    /// Signing this instead of the caller's path keeps the signature valid
    /// after URL parsing percent-encodes or normalizes the path.
    fn signed_path(&self, url: &Url) -> String {
        let prefix = self.base_url.path().trim_end_matches('/');
        let path = url.path();
        let path = path.strip_prefix(prefix).unwrap_or(path);
        match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        }
    }

    async fn send_once(&self, url: Url, envelope: &RequestEnvelope) -> Result<reqwest::Response> {
        let body = envelope.body_str();
        let signed_headers = match &self.signer {
            Some(signer) => Some(signer.headers(
                envelope.method.as_str(),
                &self.signed_path(&url),
                self.timestamp(),
                body,
            )?),
            None => None,
        };

        let mut builder = self
            .http_client
            .request(envelope.method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.config.user_agent.as_str());

        if let Some(headers) = signed_headers {
            builder = builder.headers(headers);
        }

        if !body.is_empty() {
            builder = builder.body(body.to_string());
        }

        Ok(builder.send().await?)
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()?)
}
