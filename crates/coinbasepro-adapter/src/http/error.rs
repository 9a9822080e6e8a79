/*
[INPUT]:  Error sources (signing, transport, API status, decoding, feed)
[OUTPUT]: Structured error type shared by REST and feed layers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing status classification
*/

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Main error type for the Coinbase Pro adapter
#[derive(Error, Debug)]
pub enum CoinbaseError {
    /// API secret could not be turned into a signing key
    #[error("failed to sign request: {0}")]
    Signing(String),

    /// Connection, DNS, TLS or timeout failure
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server kept answering 429 until the attempt budget ran out
    #[error("rate limited after {attempts} attempt(s): {message}")]
    RateLimit {
        attempts: u32,
        message: String,
        /// Headers of the final 429 response
        headers: HeaderMap,
    },

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        headers: HeaderMap,
    },

    /// Response body or feed frame did not match the expected shape
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// WebSocket protocol or I/O failure
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// Feed ended without the handler asking to stop
    #[error("feed connection closed by server")]
    FeedClosed,

    /// Caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// Failure raised by a caller-supplied feed handler
    #[error("handler failed: {0}")]
    Handler(Box<dyn std::error::Error + Send + Sync>),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<base64::DecodeError> for CoinbaseError {
    fn from(err: base64::DecodeError) -> Self {
        CoinbaseError::Signing(format!("secret is not valid base64: {err}"))
    }
}

impl From<tungstenite::Error> for CoinbaseError {
    fn from(err: tungstenite::Error) -> Self {
        CoinbaseError::WebSocket(Box::new(err))
    }
}

/// Error body returned by the REST API on non-200 responses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

impl CoinbaseError {
    /// Wrap an arbitrary failure raised inside a feed handler
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        CoinbaseError::Handler(err.into())
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        CoinbaseError::Api {
            status: status.as_u16(),
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Attach the headers of the response that produced this error
    pub(crate) fn with_headers(mut self, response_headers: HeaderMap) -> Self {
        if let CoinbaseError::Api { headers, .. } | CoinbaseError::RateLimit { headers, .. } = &mut self {
            *headers = response_headers;
        }
        self
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        CoinbaseError::Decode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status associated with the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CoinbaseError::Api { status, .. } => Some(*status),
            CoinbaseError::RateLimit { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            CoinbaseError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response headers of the failed call, e.g. to read rate-limit hints
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            CoinbaseError::Api { headers, .. } | CoinbaseError::RateLimit { headers, .. } => {
                Some(headers)
            }
            _ => None,
        }
    }

    /// Check if waiting and calling again may succeed
    ///
    /// Only rate limiting qualifies. Other statuses and transport failures are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoinbaseError::RateLimit { .. })
    }

    /// Route or resource not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoinbaseError::Api { status: 404, .. })
    }

    /// Credentials rejected by the server
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoinbaseError::Api { status: 401, .. })
    }
}

/// Result type alias for Coinbase Pro operations
pub type Result<T> = std::result::Result<T, CoinbaseError>;
