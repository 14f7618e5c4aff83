//! WebSocket write pump.
//!
//! The station only ever talks to us, so nothing here carries data: the
//! pump's traffic is pongs queued by the read pump and the final close.

use futures_util::SinkExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Drains queued control frames into the socket until cancelled, the queue
/// closes or a write fails, then attempts a close frame.
pub(crate) async fn write_pump<S>(
    mut sink: S,
    mut control_rx: mpsc::Receiver<tungstenite::Message>,
    cancel: CancellationToken,
) where
    S: SinkExt<tungstenite::Message, Error = tungstenite::Error> + Unpin,
{
    let mut sent = 0usize;
    loop {
        let msg = tokio::select! {
            _ = cancel.cancelled() => break,
            msg = control_rx.recv() => msg,
        };
        let Some(msg) = msg else { break };
        if let Err(e) = sink.send(msg).await {
            warn!(sent, "failed to write control frame: {e}");
            break;
        }
        sent += 1;
    }

    match sink.send(tungstenite::Message::Close(None)).await {
        Ok(()) => debug!(sent, "sent close frame"),
        // Usually the station already dropped the socket.
        Err(e) => debug!(sent, "close frame not sent: {e}"),
    }
}
