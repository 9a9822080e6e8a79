/*
[INPUT]:  Feed URL from the client config, a control message and a handler
[OUTPUT]: Decoded feed messages dispatched in receive order until stop/error/cancel
[POS]:    WebSocket layer - real-time data stream handling
[UPDATE]: When changing connection lifecycle or frame handling
*/

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::http::{CoinbaseClient, CoinbaseError, Result};
use crate::ws::{Control, Message, SignedMessage};

const RAW_LOG_MAX_BYTES: usize = 1024;

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl CoinbaseClient {
    /// Open the feed, send `initial` and hand every decoded message to `handler`
    ///
    /// Returns `Ok(())` only when the handler answers [`Control::Stop`]. Handler
    /// errors come back unchanged. The connection is closed before returning.
    pub async fn subscribe<M, F>(
        &self,
        cancel: &CancellationToken,
        initial: &M,
        mut handler: F,
    ) -> Result<()>
    where
        M: Serialize + ?Sized,
        F: FnMut(Message) -> Result<Control>,
    {
        let payload = serde_json::to_string(initial).map_err(CoinbaseError::Encode)?;
        let url = self.websocket_url().as_str();

        let (mut ws, _response) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
            connected = connect_async(url) => connected?,
        };
        info!(url, "feed connected");

        let outcome = run_feed(&mut ws, cancel, payload, &mut handler).await;

        match ws.close(None).await {
            Ok(()) => debug!(url, "feed closed"),
            // Already closed by the peer or a failed transport
            Err(err) => debug!(url, error = %err, "feed close skipped"),
        }

        outcome
    }

    /// Wrap a control message with authentication fields for private channels
    pub fn sign_feed_message<M>(&self, message: M) -> Result<SignedMessage<M>> {
        let signer = self.signer().ok_or_else(|| {
            CoinbaseError::Config("signing a feed message requires credentials".to_string())
        })?;
        signer.sign_feed_message(message, self.timestamp())
    }
}

async fn run_feed<F>(
    ws: &mut FeedStream,
    cancel: &CancellationToken,
    payload: String,
    handler: &mut F,
) -> Result<()>
where
    F: FnMut(Message) -> Result<Control>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
        sent = ws.send(WsMessage::Text(payload.into())) => sent?,
    }
    info!("feed subscription sent");

    let mut dispatched: u64 = 0;
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CoinbaseError::Cancelled),
            frame = ws.next() => frame,
        };

        let decoded = match frame {
            Some(Ok(WsMessage::Text(text))) => decode(text.as_bytes()),
            Some(Ok(WsMessage::Binary(bytes))) => decode(&bytes),
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => continue,
            Some(Ok(WsMessage::Close(frame))) => {
                info!(dispatched, ?frame, "feed closed by server");
                return Err(CoinbaseError::FeedClosed);
            }
            Some(Err(err)) => return Err(err.into()),
            None => return Err(CoinbaseError::FeedClosed),
        }?;

        dispatched += 1;
        match handler(decoded)? {
            Control::Continue => {}
            Control::Stop => {
                info!(dispatched, "feed stopped by handler");
                return Ok(());
            }
        }
    }
}

fn decode(raw: &[u8]) -> Result<Message> {
    serde_json::from_slice(raw).map_err(|err| {
        let text = String::from_utf8_lossy(raw);
        debug!(
            error = %err,
            bytes = raw.len(),
            message = %truncate_for_log(&text, RAW_LOG_MAX_BYTES),
            "feed message decode failed"
        );
        CoinbaseError::decode("feed message", err)
    })
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
