/*
[INPUT]:  Feed configuration, control messages and message handlers
[OUTPUT]: Real-time market data and order updates
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod client;
pub mod message;

pub use message::{
    BookSnapshot, Control, Heartbeat, Level2Update, MatchMessage, Message, MessageChannel,
    OrderMessage, SignedMessage, SnapshotChange, SnapshotEntry, SubscribeKind, SubscribeRequest,
    TickerMessage,
};
