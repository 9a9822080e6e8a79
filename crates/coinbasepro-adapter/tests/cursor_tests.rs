/*
[INPUT]:  Mock paged responses with CB-BEFORE / CB-AFTER headers
[OUTPUT]: Test results for cursor termination and directionality
[POS]:    Integration tests - pagination
[UPDATE]: When pagination headers or cursor states change
*/

mod common;

use common::{anonymous_client, setup_mock_server};
use coinbasepro_adapter::{CancellationToken, CoinbaseError, CursorState, PaginationParams, Trade};
use rstest::rstest;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

const TRADES_PATH: &str = "/products/BTC-USD/trades";

fn trades_body(ids: &[i64]) -> String {
    let trades: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "time": "2014-11-07T22:19:28.578544Z",
                "trade_id": id,
                "price": "10.00000000",
                "size": "0.01000000",
                "side": "buy"
            })
        })
        .collect();
    serde_json::Value::Array(trades).to_string()
}

#[tokio::test]
async fn test_cursor_terminates_when_after_token_disappears() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(TRADES_PATH))
        .and(query_param_is_missing("after"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("CB-BEFORE", "4")
                .insert_header("CB-AFTER", "3")
                .set_body_string(trades_body(&[4, 3])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRADES_PATH))
        .and(query_param("after", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("CB-BEFORE", "2")
                .set_body_string(trades_body(&[2, 1])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, 0);
    let cancel = CancellationToken::new();
    let mut cursor = client.list_trades("BTC-USD", PaginationParams::default().with_limit(2));

    let mut seen = Vec::new();
    while cursor.has_more() {
        let page: Vec<Trade> = assert_ok!(cursor.next_page(&cancel).await);
        seen.extend(page.into_iter().map(|trade| trade.trade_id));
    }

    assert_eq!(seen, vec![4, 3, 2, 1]);
    assert_eq!(cursor.state(), CursorState::Exhausted);

    // Exhausted cursors answer empty without touching the server
    let page = assert_ok!(cursor.next_page(&cancel).await);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_prev_page_uses_before_token_only() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(TRADES_PATH))
        .and(query_param("before", "10"))
        .and(query_param_is_missing("after"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("CB-BEFORE", "12")
                .insert_header("CB-AFTER", "11")
                .set_body_string(trades_body(&[12, 11])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, 0);
    let pagination = PaginationParams {
        before: Some("10".to_string()),
        after: Some("5".to_string()),
        ..PaginationParams::default()
    };
    let mut cursor = client.list_trades("BTC-USD", pagination);

    let page = assert_ok!(cursor.prev_page(&CancellationToken::new()).await);
    assert_eq!(page.len(), 2);
    assert!(cursor.has_more());
    assert_eq!(cursor.pagination().before.as_deref(), Some("12"));
    assert_eq!(cursor.pagination().after.as_deref(), Some("11"));
}

#[rstest]
#[case::missing_header(None)]
#[case::empty_header(Some(""))]
#[tokio::test]
async fn test_prev_page_exhausts_without_before_token(#[case] before: Option<&'static str>) {
    let server = setup_mock_server().await;
    let mut response = ResponseTemplate::new(200)
        .insert_header("CB-AFTER", "7")
        .set_body_string(trades_body(&[8]));
    if let Some(value) = before {
        response = response.insert_header("CB-BEFORE", value);
    }
    Mock::given(method("GET"))
        .and(path(TRADES_PATH))
        .respond_with(response)
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, 0);
    let mut cursor = client.list_trades(
        "BTC-USD",
        PaginationParams {
            before: Some("7".to_string()),
            ..PaginationParams::default()
        },
    );

    let page = assert_ok!(cursor.prev_page(&CancellationToken::new()).await);
    assert_eq!(page.len(), 1);
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

#[tokio::test]
async fn test_failed_page_exhausts_cursor() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path(TRADES_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"message":"Invalid limit"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, 0);
    let cancel = CancellationToken::new();
    let mut cursor = client.list_trades("BTC-USD", PaginationParams::default().with_limit(5000));

    let err = assert_err!(cursor.next_page(&cancel).await);
    assert!(matches!(err, CoinbaseError::Api { status: 400, .. }));
    assert_eq!(cursor.state(), CursorState::Exhausted);

    let page = assert_ok!(cursor.next_page(&cancel).await);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_limit_and_extras_reach_server() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("limit", "100"))
        .and(query_param("status", "done"))
        .and(query_param("product_id", "ETH-USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, 0);
    let mut pagination = PaginationParams::default().with_limit(100);
    pagination.add_extra_param("status", "done");
    pagination.add_extra_param("product_id", "ETH-USD");
    let mut cursor = client.cursor::<serde_json::Value>("/orders", pagination);

    let page = assert_ok!(cursor.next_page(&CancellationToken::new()).await);
    assert!(page.is_empty());

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.query(),
        Some("limit=100&status=done&product_id=ETH-USD")
    );
}
