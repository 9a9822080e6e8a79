/*
[INPUT]:  Product identifier (e.g., "BTC-USD")
[OUTPUT]: Market data (server time, product, ticker, recent trades)
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use coinbasepro_adapter::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Example: Query market data (no authentication required)
///
/// Run with `RUST_LOG=debug` to see every HTTP attempt.
#[tokio::main]
async fn main() {
    init_tracing();

    let client = match CoinbaseClient::with_config(ClientConfig::default().with_retry_count(3)) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to create client");
            return;
        }
    };
    let cancel = CancellationToken::new();
    let product_id = "BTC-USD";

    match client.get_time(&cancel).await {
        Ok(time) => info!(iso = %time.iso, epoch = time.epoch, "server time"),
        Err(e) => error!(error = %e, "failed to query server time"),
    }

    match client.get_product(&cancel, product_id).await {
        Ok(product) => info!(
            product_id,
            status = %product.status,
            quote_increment = %product.quote_increment,
            "product"
        ),
        Err(e) => error!(error = %e, "failed to query product"),
    }

    match client.get_ticker(&cancel, product_id).await {
        Ok(ticker) => info!(
            product_id,
            price = %ticker.price,
            bid = %ticker.bid,
            ask = %ticker.ask,
            "ticker"
        ),
        Err(e) => error!(error = %e, "failed to query ticker"),
    }

    // Walk three pages of trade history
    let mut trades = client.list_trades(product_id, PaginationParams::default().with_limit(5));
    for page_index in 0..3 {
        if !trades.has_more() {
            break;
        }
        match trades.next_page(&cancel).await {
            Ok(page) => {
                for trade in &page {
                    info!(
                        page_index,
                        trade_id = trade.trade_id,
                        side = ?trade.side,
                        price = %trade.price,
                        size = %trade.size,
                        "trade"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "failed to page trades");
                break;
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
