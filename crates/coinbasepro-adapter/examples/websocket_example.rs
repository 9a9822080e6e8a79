/*
[INPUT]:  Product identifiers to watch
[OUTPUT]: Real-time ticker updates until Ctrl-C or 20 messages
[POS]:    Examples - WebSocket stream handling
[UPDATE]: When WebSocket API changes
*/

use coinbasepro_adapter::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const MESSAGE_LIMIT: usize = 20;

/// Example: public ticker feed
///
/// Stops after a fixed number of ticker messages, or earlier on Ctrl-C.
#[tokio::main]
async fn main() {
    init_tracing();

    let client = match CoinbaseClient::new() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to create client");
            return;
        }
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        signal_token.cancel();
    });

    let subscription = SubscribeRequest::subscribe()
        .product("BTC-USD")
        .product("ETH-USD")
        .channel(MessageChannel::new("ticker"));

    let mut seen = 0;
    let result = client
        .subscribe(&shutdown, &subscription, |message| {
            match message {
                Message::Ticker(ticker) => {
                    seen += 1;
                    info!(
                        product_id = %ticker.product_id,
                        price = %ticker.price,
                        side = ?ticker.side,
                        "ticker"
                    );
                }
                Message::Subscriptions { channels } => {
                    info!(channels = channels.len(), "subscribed");
                }
                Message::Error { message, reason } => {
                    return Err(CoinbaseError::handler(format!(
                        "feed rejected subscription: {message} ({})",
                        reason.unwrap_or_default()
                    )));
                }
                _ => {}
            }
            Ok(if seen >= MESSAGE_LIMIT {
                Control::Stop
            } else {
                Control::Continue
            })
        })
        .await;

    match result {
        Ok(()) => info!(seen, "feed finished"),
        Err(CoinbaseError::Cancelled) => info!(seen, "feed cancelled"),
        Err(e) => error!(error = %e, "feed failed"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
