/*
[INPUT]:  Raw feed frames (JSON objects discriminated by `type`)
[OUTPUT]: Parsed Message variants, control messages and signed wrappers
[POS]:    WebSocket layer - message parsing and validation
[UPDATE]: When adding new message types or changing format
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::http::FeedAuth;
use crate::types::{OrderType, Side, Time};

/// Handler verdict after each dispatched message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// End the subscription gracefully
    Stop,
}

/// Inbound feed message, discriminated by the `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Subscriptions {
        channels: Vec<MessageChannel>,
    },
    Heartbeat(Heartbeat),
    Ticker(TickerMessage),
    Snapshot(BookSnapshot),
    #[serde(rename = "l2update")]
    L2Update(Level2Update),
    Received(OrderMessage),
    Open(OrderMessage),
    Done(OrderMessage),
    Match(MatchMessage),
    LastMatch(MatchMessage),
    Change(OrderMessage),
    Activate(OrderMessage),
    Error {
        message: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Any type this crate does not model
    #[serde(other)]
    Other,
}

impl Message {
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Message::Heartbeat(m) => Some(&m.product_id),
            Message::Ticker(m) => Some(&m.product_id),
            Message::Snapshot(m) => Some(&m.product_id),
            Message::L2Update(m) => Some(&m.product_id),
            Message::Received(m)
            | Message::Open(m)
            | Message::Done(m)
            | Message::Change(m)
            | Message::Activate(m) => Some(&m.product_id),
            Message::Match(m) | Message::LastMatch(m) => Some(&m.product_id),
            Message::Subscriptions { .. } | Message::Error { .. } | Message::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChannel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

impl MessageChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_ids: Vec::new(),
        }
    }

    pub fn with_products<I, S>(name: impl Into<String>, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscribeKind {
    Subscribe,
    Unsubscribe,
}

/// Outbound control message opening or closing channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub kind: SubscribeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
    pub channels: Vec<MessageChannel>,
}

impl SubscribeRequest {
    pub fn subscribe() -> Self {
        Self {
            kind: SubscribeKind::Subscribe,
            product_ids: Vec::new(),
            channels: Vec::new(),
        }
    }

    pub fn unsubscribe() -> Self {
        Self {
            kind: SubscribeKind::Unsubscribe,
            ..Self::subscribe()
        }
    }

    /// Product applied to every channel without its own product list
    pub fn product(mut self, product_id: impl Into<String>) -> Self {
        self.product_ids.push(product_id.into());
        self
    }

    pub fn channel(mut self, channel: MessageChannel) -> Self {
        self.channels.push(channel);
        self
    }
}

/// Control message carrying feed authentication fields at the top level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedMessage<M> {
    #[serde(flatten)]
    pub message: M,
    #[serde(flatten)]
    pub auth: FeedAuth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heartbeat {
    pub sequence: i64,
    pub last_trade_id: i64,
    pub product_id: String,
    pub time: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMessage {
    #[serde(default)]
    pub sequence: i64,
    pub product_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub open_24h: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub volume_24h: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub low_24h: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub high_24h: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub best_bid: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub best_ask: Option<Decimal>,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub time: Option<Time>,
    #[serde(default)]
    pub trade_id: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub last_size: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub product_id: String,
    pub bids: Vec<SnapshotEntry>,
    pub asks: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level2Update {
    pub product_id: String,
    #[serde(default)]
    pub time: Option<Time>,
    pub changes: Vec<SnapshotChange>,
}

/// Lifecycle event of a single order on the full channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMessage {
    pub product_id: String,
    #[serde(default)]
    pub sequence: Option<i64>,
    #[serde(default)]
    pub time: Option<Time>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub funds: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub remaining_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub new_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub old_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub stop_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMessage {
    pub trade_id: i64,
    #[serde(default)]
    pub sequence: i64,
    pub maker_order_id: String,
    pub taker_order_id: String,
    pub time: Time,
    pub product_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub side: Side,
}

/// Book level sent as `[price, size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRepr", into = "EntryRepr")]
pub struct SnapshotEntry {
    pub price: Decimal,
    pub size: Decimal,
}

/// Level-2 delta sent as `[side, price, size]`; a zero size removes the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChangeRepr", into = "ChangeRepr")]
pub struct SnapshotChange {
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
}

// Positional wire forms. Tuple structs reject arrays of any other length.
#[derive(Serialize, Deserialize)]
struct EntryRepr(
    #[serde(with = "rust_decimal::serde::str")] Decimal,
    #[serde(with = "rust_decimal::serde::str")] Decimal,
);

#[derive(Serialize, Deserialize)]
struct ChangeRepr(
    Side,
    #[serde(with = "rust_decimal::serde::str")] Decimal,
    #[serde(with = "rust_decimal::serde::str")] Decimal,
);

impl From<EntryRepr> for SnapshotEntry {
    fn from(EntryRepr(price, size): EntryRepr) -> Self {
        Self { price, size }
    }
}

impl From<SnapshotEntry> for EntryRepr {
    fn from(entry: SnapshotEntry) -> Self {
        EntryRepr(entry.price, entry.size)
    }
}

impl From<ChangeRepr> for SnapshotChange {
    fn from(ChangeRepr(side, price, size): ChangeRepr) -> Self {
        Self { side, price, size }
    }
}

impl From<SnapshotChange> for ChangeRepr {
    fn from(change: SnapshotChange) -> Self {
        ChangeRepr(change.side, change.price, change.size)
    }
}
