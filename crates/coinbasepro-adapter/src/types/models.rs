/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, OrderType, Side, TimeInForce};
use super::time::Time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTime {
    pub iso: Time,
    pub epoch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub base_currency: String,
    pub quote_currency: String,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub base_min_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub base_max_size: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_increment: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_increment: Decimal,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub min_market_funds: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub max_market_funds: Option<Decimal>,
    #[serde(default)]
    pub margin_enabled: bool,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub limit_only: bool,
    #[serde(default)]
    pub cancel_only: bool,
    #[serde(default)]
    pub trading_disabled: bool,
    pub status: String,
    #[serde(default)]
    pub status_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub trade_id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    pub time: Time,
    #[serde(with = "rust_decimal::serde::str")]
    pub bid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ask: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub time: Time,
    pub trade_id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hold: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available: Decimal,
    #[serde(default)]
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDetails {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub trade_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub created_at: Time,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub details: Option<LedgerDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product_id: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub funds: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub settled: bool,
    #[serde(default)]
    pub created_at: Option<Time>,
    #[serde(default)]
    pub done_at: Option<Time>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub fill_fees: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub filled_size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub executed_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub trade_id: i64,
    pub product_id: String,
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee: Decimal,
    pub created_at: Time,
    pub side: Side,
    #[serde(default)]
    pub settled: bool,
    #[serde(default)]
    pub liquidity: Option<String>,
}
