/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Coinbase Pro adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;
pub mod ws;

// Re-export commonly used types from auth
pub use auth::Credentials;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    CoinbaseClient,
    CoinbaseError,
    Cursor,
    CursorState,
    Direction,
    FeedAuth,
    PaginationParams,
    RequestEnvelope,
    RequestSigner,
    ResponseMeta,
    Result,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    Control,
    Message,
    MessageChannel,
    SignedMessage,
    SnapshotChange,
    SnapshotEntry,
    SubscribeRequest,
};

pub use tokio_util::sync::CancellationToken;
