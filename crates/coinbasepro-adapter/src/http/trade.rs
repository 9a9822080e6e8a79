/*
[INPUT]:  Order requests and order filters
[OUTPUT]: Order responses and confirmation
[POS]:    HTTP layer - trading endpoints (require auth, body is signed)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::http::{CoinbaseClient, Cursor, RequestEnvelope, Result};
use crate::types::{ListOrdersParams, NewOrderRequest, Order};

impl CoinbaseClient {
    /// Place a new order
    ///
    /// POST /orders
    pub async fn create_order(
        &self,
        cancel: &CancellationToken,
        order: &NewOrderRequest,
    ) -> Result<Order> {
        let envelope = RequestEnvelope::new(Method::POST, "/orders").with_json(order)?;
        self.request(cancel, &envelope).await
    }

    /// Cancel an open order; the response body is ignored
    ///
    /// DELETE /orders/{order_id}
    pub async fn cancel_order(&self, cancel: &CancellationToken, order_id: &str) -> Result<()> {
        let envelope = RequestEnvelope::new(Method::DELETE, format!("/orders/{}", order_id));
        self.execute_discard(cancel, &envelope).await?;
        Ok(())
    }

    /// GET /orders/{order_id}
    pub async fn get_order(&self, cancel: &CancellationToken, order_id: &str) -> Result<Order> {
        let endpoint = format!("/orders/{}", order_id);
        self.request(cancel, &RequestEnvelope::get(endpoint)).await
    }

    /// GET /orders?status=..&product_id=..
    pub fn list_orders(&self, params: ListOrdersParams) -> Cursor<'_, Order> {
        self.cursor("/orders", params.into_pagination())
    }
}
