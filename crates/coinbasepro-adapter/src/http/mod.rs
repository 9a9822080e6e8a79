/*
[INPUT]:  HTTP client configuration, credentials and API endpoints
[OUTPUT]: Signed HTTP calls, paginated cursors and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod cursor;
pub mod error;
pub mod public;
pub mod signature;
pub mod trade;
pub mod user;

pub use error::{CoinbaseError, Result};
pub use signature::{FeedAuth, RequestSigner};

pub use client::{ClientConfig, CoinbaseClient, RequestEnvelope, ResponseMeta, backoff_delay};
pub use cursor::{Cursor, CursorState, Direction, PaginationParams};
