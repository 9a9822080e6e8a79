/*
[INPUT]:  API key, passphrase and base64-encoded secret
[OUTPUT]: Validated credential bundle for authenticated calls
[POS]:    Auth layer - credential storage
[UPDATE]: When credential fields or validation rules change
*/

use std::fmt;

use crate::http::{CoinbaseError, Result};

/// API credentials for authenticated REST calls and feed subscriptions
///
/// The secret is kept in its base64 form and only decoded while signing.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    passphrase: String,
    secret: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values
    pub fn new(
        key: impl Into<String>,
        passphrase: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            key: key.into(),
            passphrase: passphrase.into(),
            secret: secret.into(),
        };

        if credentials.key.is_empty() {
            return Err(CoinbaseError::Config("key cannot be empty".to_string()));
        }
        if credentials.passphrase.is_empty() {
            return Err(CoinbaseError::Config(
                "passphrase cannot be empty".to_string(),
            ));
        }
        if credentials.secret.is_empty() {
            return Err(CoinbaseError::Config("secret cannot be empty".to_string()));
        }

        Ok(credentials)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Base64-encoded signing secret
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("passphrase", &"***")
            .field("secret", &"***")
            .finish()
    }
}
