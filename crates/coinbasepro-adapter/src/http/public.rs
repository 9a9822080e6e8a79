/*
[INPUT]:  Product identifiers and pagination parameters
[OUTPUT]: Market data (server time, products, ticker, trades)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use tokio_util::sync::CancellationToken;

use crate::http::{CoinbaseClient, Cursor, PaginationParams, RequestEnvelope, Result};
use crate::types::{Product, ServerTime, Ticker, Trade};

impl CoinbaseClient {
    /// Exchange clock, useful for deriving a time offset
    ///
    /// GET /time
    pub async fn get_time(&self, cancel: &CancellationToken) -> Result<ServerTime> {
        self.request(cancel, &RequestEnvelope::get("/time")).await
    }

    /// GET /products
    pub async fn get_products(&self, cancel: &CancellationToken) -> Result<Vec<Product>> {
        self.request(cancel, &RequestEnvelope::get("/products")).await
    }

    /// GET /products/{product_id}
    pub async fn get_product(&self, cancel: &CancellationToken, product_id: &str) -> Result<Product> {
        let endpoint = format!("/products/{}", product_id);
        self.request(cancel, &RequestEnvelope::get(endpoint)).await
    }

    /// Snapshot of the last trade, best bid/ask and 24h volume
    ///
    /// GET /products/{product_id}/ticker
    pub async fn get_ticker(&self, cancel: &CancellationToken, product_id: &str) -> Result<Ticker> {
        let endpoint = format!("/products/{}/ticker", product_id);
        self.request(cancel, &RequestEnvelope::get(endpoint)).await
    }

    /// Paged trade history, newest first
    ///
    /// GET /products/{product_id}/trades
    pub fn list_trades(&self, product_id: &str, pagination: PaginationParams) -> Cursor<'_, Trade> {
        self.cursor(format!("/products/{}/trades", product_id), pagination)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, CoinbaseClient, CoinbaseError, PaginationParams};
    use crate::types::Side;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CoinbaseClient {
        let config = ClientConfig::default().with_base_urls(server.uri(), "ws://127.0.0.1:1");
        CoinbaseClient::with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_get_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/time"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"iso":"2015-01-07T23:47:25.201Z","epoch":1420674445.201}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let time = client_for(&server)
            .get_time(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(time.iso.0.timestamp(), 1_420_674_445);
        assert!((time.epoch - 1_420_674_445.201).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_get_products() {
        let server = MockServer::start().await;
        let mock_response = r#"[
            {
                "id": "BTC-USD",
                "base_currency": "BTC",
                "quote_currency": "USD",
                "base_min_size": "0.001",
                "base_max_size": "10000.00",
                "quote_increment": "0.01",
                "base_increment": "0.00000001",
                "display_name": "BTC/USD",
                "min_market_funds": "10",
                "max_market_funds": "1000000",
                "margin_enabled": false,
                "post_only": false,
                "limit_only": false,
                "cancel_only": false,
                "trading_disabled": false,
                "status": "online",
                "status_message": ""
            }
        ]"#;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&server)
            .await;

        let products = client_for(&server)
            .get_products(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "BTC-USD");
        assert_eq!(products[0].quote_increment.to_string(), "0.01");
        assert_eq!(products[0].base_min_size, Some("0.001".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/NOPE-USD"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"NotFound"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_product(&CancellationToken::new(), "NOPE-USD")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, CoinbaseError::Api { ref message, .. } if message == "NotFound"));
    }

    #[tokio::test]
    async fn test_get_ticker() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "trade_id": 4729088,
            "price": "333.99",
            "size": "0.193",
            "bid": "333.98",
            "ask": "333.99",
            "volume": "5957.11914015",
            "time": "2015-11-14T20:46:03.511254Z"
        }"#;
        Mock::given(method("GET"))
            .and(path("/products/BTC-USD/ticker"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&server)
            .await;

        let ticker = client_for(&server)
            .get_ticker(&CancellationToken::new(), "BTC-USD")
            .await
            .unwrap();
        assert_eq!(ticker.trade_id, 4_729_088);
        assert_eq!(ticker.bid.to_string(), "333.98");
    }

    #[tokio::test]
    async fn test_list_trades_first_page() {
        let server = MockServer::start().await;
        let mock_response = r#"[
            {"time": "2014-11-07T22:19:28.578544Z", "trade_id": 74, "price": "10.00000000", "size": "0.01000000", "side": "buy"},
            {"time": "2014-11-07T01:08:43.642366Z", "trade_id": 73, "price": "100.00000000", "size": "0.01000000", "side": "sell"}
        ]"#;
        Mock::given(method("GET"))
            .and(path("/products/BTC-USD/trades"))
            .and(query_param("limit", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cb-before", "74")
                    .insert_header("cb-after", "73")
                    .set_body_string(mock_response),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut cursor = client.list_trades("BTC-USD", PaginationParams::default().with_limit(2));
        let trades = cursor.next_page(&CancellationToken::new()).await.unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].side, Side::Sell);
        assert!(cursor.has_more());
        assert_eq!(cursor.pagination().after.as_deref(), Some("73"));
    }
}
