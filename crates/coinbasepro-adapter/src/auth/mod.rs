/*
[INPUT]:  API key, passphrase and base64 secret
[OUTPUT]: Credentials and HMAC-SHA256 request signatures
[POS]:    Auth layer - handles Coinbase Pro API authentication
[UPDATE]: When auth flow or signature methods change
*/

pub mod credentials;
pub mod signer;

pub use credentials::Credentials;
pub use signer::{FEED_VERIFY_METHOD, FEED_VERIFY_PATH, canonical_message, sign};
