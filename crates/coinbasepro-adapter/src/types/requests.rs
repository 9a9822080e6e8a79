/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs and list filters
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, OrderType, Side, TimeInForce};
use crate::http::PaginationParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub post_only: bool,
}

impl NewOrderRequest {
    /// Limit order for `size` at `price`
    pub fn limit(product_id: impl Into<String>, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            side,
            product_id: product_id.into(),
            client_oid: None,
            price: Some(price),
            size: Some(size),
            funds: None,
            time_in_force: None,
            post_only: false,
        }
    }

    /// Market order spending `funds` of the quote currency
    pub fn market_funds(product_id: impl Into<String>, side: Side, funds: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            side,
            product_id: product_id.into(),
            client_oid: None,
            price: None,
            size: None,
            funds: Some(funds),
            time_in_force: None,
            post_only: false,
        }
    }

    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn post_only(mut self) -> Self {
        self.post_only = true;
        self
    }
}

/// Filters for `GET /orders`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOrdersParams {
    pub status: Vec<OrderStatus>,
    pub product_id: Option<String>,
    pub pagination: PaginationParams,
}

impl ListOrdersParams {
    /// Pagination parameters carrying the filters as extras
    pub fn into_pagination(self) -> PaginationParams {
        let mut pagination = self.pagination;
        for status in self.status {
            pagination.add_extra_param("status", status.as_str());
        }
        if let Some(product_id) = self.product_id {
            pagination.add_extra_param("product_id", product_id);
        }
        pagination
    }
}

/// Filters for `GET /fills`; the API requires one of the two ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFillsParams {
    pub order_id: Option<String>,
    pub product_id: Option<String>,
    pub pagination: PaginationParams,
}

impl ListFillsParams {
    pub fn into_pagination(self) -> PaginationParams {
        let mut pagination = self.pagination;
        if let Some(order_id) = self.order_id {
            pagination.add_extra_param("order_id", order_id);
        }
        if let Some(product_id) = self.product_id {
            pagination.add_extra_param("product_id", product_id);
        }
        pagination
    }
}
