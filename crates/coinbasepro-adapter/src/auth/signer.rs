/*
[INPUT]:  Base64 secret and canonical message components
[OUTPUT]: Base64-encoded HMAC-SHA256 signatures
[POS]:    Auth layer - cryptographic signing for request authentication
[UPDATE]: When changing signing algorithm or canonical message format
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::{CoinbaseError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Method used in the feed authentication handshake
pub const FEED_VERIFY_METHOD: &str = "GET";
/// Path used in the feed authentication handshake
pub const FEED_VERIFY_PATH: &str = "/users/self/verify";

/// Sign `message` with the base64-encoded `secret`
///
/// Returns the base64-encoded HMAC-SHA256 digest. The decoded key only lives
/// for the duration of this call.
pub fn sign(secret: &str, message: &str) -> Result<String> {
    let key = BASE64.decode(secret)?;

    // HMAC takes keys of any length, so this only fails if the MAC type changes
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| CoinbaseError::Signing(format!("invalid signing key: {e}")))?;
    mac.update(message.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Build the string a request signature is computed over
///
/// Format: `{timestamp}{METHOD}{path_with_query}{body}` with no separators.
pub fn canonical_message(timestamp: i64, method: &str, path: &str, body: &str) -> String {
    format!("{timestamp}{}{path}{body}", method.to_ascii_uppercase())
}
