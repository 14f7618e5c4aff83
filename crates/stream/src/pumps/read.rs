//! WebSocket read pump: decodes incoming frames and forwards measurements.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use partcount_protocol::constants::WS_MAX_MESSAGE_SIZE;
use partcount_protocol::{Frame, decode_frame};

use crate::types::StreamEvent;

/// Reads messages until the connection ends, forwarding each decoded
/// measurement in arrival order.
///
/// Returns on close frame, read error, end of stream, cancellation, or when
/// the event receiver is gone. Undecodable text frames are logged and
/// skipped without closing the connection.
pub(crate) async fn read_pump<S>(
    mut read: S,
    events_tx: mpsc::Sender<StreamEvent>,
    write_tx: mpsc::Sender<tungstenite::Message>,
    cancel: CancellationToken,
) where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            msg = read.next() => {
                match msg {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        let Some(frame) = decode_text(&text) else {
                            continue;
                        };
                        if events_tx.send(StreamEvent::Measurement(frame)).await.is_err() {
                            debug!("event receiver dropped, stopping read pump");
                            break;
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(data))) => {
                        trace!("received ping, sending pong");
                        let _ = write_tx.send(tungstenite::Message::Pong(data)).await;
                    }
                    Some(Ok(tungstenite::Message::Pong(_))) => {
                        trace!("received pong");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        debug!(?frame, "received close frame");
                        break;
                    }
                    Some(Ok(_)) => {
                        trace!("ignoring non-text frame");
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {e}");
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }
}

/// Decodes a text frame, logging and discarding anything that is not a
/// measurement.
fn decode_text(text: &str) -> Option<Frame> {
    if text.len() > WS_MAX_MESSAGE_SIZE {
        warn!("message too large ({} bytes), dropping", text.len());
        return None;
    }

    match decode_frame(text) {
        Ok(frame) => {
            trace!(event = ?frame.event, "received measurement");
            Some(frame)
        }
        Err(e) => {
            warn!(payload = %text, "failed to decode frame: {e}");
            None
        }
    }
}
