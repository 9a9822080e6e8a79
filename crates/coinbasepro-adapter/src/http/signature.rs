/*
[INPUT]:  Credentials, request method/path/body and a unix timestamp
[OUTPUT]: Signed request headers (CB-ACCESS-*) and feed auth fields
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or header format
*/

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Credentials, FEED_VERIFY_METHOD, FEED_VERIFY_PATH};
use crate::http::{CoinbaseError, Result};
use crate::ws::SignedMessage;

// Header names are matched case-insensitively; `HeaderName::from_static` needs lowercase.
pub const HEADER_ACCESS_KEY: &str = "cb-access-key";
pub const HEADER_ACCESS_PASSPHRASE: &str = "cb-access-passphrase";
pub const HEADER_ACCESS_TIMESTAMP: &str = "cb-access-timestamp";
pub const HEADER_ACCESS_SIGN: &str = "cb-access-sign";

/// Authentication fields attached to a feed control message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedAuth {
    pub key: String,
    pub passphrase: String,
    pub timestamp: String,
    pub signature: String,
}

/// Signs REST requests and feed handshakes for one set of credentials
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Generate the authentication headers for one request attempt
    pub fn headers(&self, method: &str, path: &str, timestamp: i64, body: &str) -> Result<HeaderMap> {
        let message = auth::canonical_message(timestamp, method, path, body);
        let signature = auth::sign(self.credentials.secret(), &message)?;

        let mut headers = HeaderMap::with_capacity(4);
        insert(&mut headers, HEADER_ACCESS_KEY, self.credentials.key())?;
        insert(
            &mut headers,
            HEADER_ACCESS_PASSPHRASE,
            self.credentials.passphrase(),
        )?;
        insert(&mut headers, HEADER_ACCESS_TIMESTAMP, &timestamp.to_string())?;
        insert(&mut headers, HEADER_ACCESS_SIGN, &signature)?;
        Ok(headers)
    }

    /// Sign the fixed `GET /users/self/verify` handshake used by the feed
    pub fn feed_auth(&self, timestamp: i64) -> Result<FeedAuth> {
        let message = auth::canonical_message(timestamp, FEED_VERIFY_METHOD, FEED_VERIFY_PATH, "");
        let signature = auth::sign(self.credentials.secret(), &message)?;

        Ok(FeedAuth {
            key: self.credentials.key().to_string(),
            passphrase: self.credentials.passphrase().to_string(),
            timestamp: timestamp.to_string(),
            signature,
        })
    }

    /// Attach feed authentication fields to a control message
    pub fn sign_feed_message<M>(&self, message: M, timestamp: i64) -> Result<SignedMessage<M>> {
        Ok(SignedMessage {
            message,
            auth: self.feed_auth(timestamp)?,
        })
    }
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| CoinbaseError::Config(format!("invalid {name} header value: {e}")))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
