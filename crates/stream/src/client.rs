//! Station client: one WebSocket connection at a time, reopened after a
//! fixed delay whenever it closes.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use partcount_protocol::constants::WS_MAX_MESSAGE_SIZE;

use crate::pumps::read::read_pump;
use crate::pumps::write::write_pump;
use crate::types::{ConnectionState, ReconnectConfig, StreamEvent};

/// Capacity of the event channel between the client and its consumer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors from the streaming client.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("WebSocket error: {0}")]
    Ws(#[from] tungstenite::Error),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("client shut down")]
    Shutdown,
}

/// Checks that `endpoint` is a `ws://` or `wss://` URI with a host.
pub fn validate_endpoint(endpoint: &str) -> Result<(), StreamError> {
    let invalid = |reason: String| StreamError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let request = endpoint
        .into_client_request()
        .map_err(|e| invalid(e.to_string()))?;
    let uri = request.uri();
    match uri.scheme_str() {
        Some("ws") | Some("wss") => {}
        Some(other) => return Err(invalid(format!("unsupported scheme `{other}`"))),
        None => return Err(invalid("missing scheme".into())),
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(())
}

/// A single open connection and its pump tasks.
///
/// Dropping it tears the pumps down.
struct Connection {
    read_handle: JoinHandle<()>,
    write_handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl Connection {
    /// Waits until the station closes the connection, the transport fails,
    /// or the client shuts down.
    async fn closed(mut self) {
        let _ = (&mut self.read_handle).await;
        self.cancel.cancel();
        // Give the write pump a moment to answer with a close frame.
        let _ = tokio::time::timeout(Duration::from_secs(1), &mut self.write_handle).await;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.read_handle.abort();
        self.write_handle.abort();
    }
}

/// Reconnecting client for the station's measurement stream.
///
/// [`run`](Self::run) drives the lifecycle
/// `Connecting → Open → Closed → (delay) → Connecting …` forever, until
/// [`shutdown`](Self::shutdown). Events are delivered in order on the
/// channel returned by [`take_events`](Self::take_events); the consumer
/// must keep draining it.
pub struct StreamClient {
    endpoint: String,
    reconnect: ReconnectConfig,
    events_tx: mpsc::Sender<StreamEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<StreamEvent>>>,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl StreamClient {
    /// Creates a client for `endpoint`. No connection is made until
    /// [`run`](Self::run).
    pub fn new(endpoint: impl Into<String>, reconnect: ReconnectConfig) -> Result<Self, StreamError> {
        let endpoint = endpoint.into();
        validate_endpoint(&endpoint)?;

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(ConnectionState::Connecting);

        Ok(Self {
            endpoint,
            reconnect,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            state_tx,
            cancel: CancellationToken::new(),
        })
    }

    /// Takes the event receiver. Can only be called once.
    pub async fn take_events(&self) -> Option<mpsc::Receiver<StreamEvent>> {
        self.events_rx.lock().await.take()
    }

    /// The configured station address.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Stops the client: closes the current connection and cancels any
    /// pending reconnect. [`run`](Self::run) returns afterwards.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Makes one connection attempt.
    ///
    /// On success the state is `Open` and the returned [`Connection`]'s read
    /// pump is already forwarding measurements. Only `run` calls this, so at
    /// most one connection exists at a time.
    async fn connect(&self) -> Result<Connection, StreamError> {
        if self.cancel.is_cancelled() {
            return Err(StreamError::Shutdown);
        }
        self.set_state(ConnectionState::Connecting).await;
        info!(endpoint = %self.endpoint, "connecting to station");

        let mut ws_config = tungstenite::protocol::WebSocketConfig::default();
        ws_config.max_message_size = Some(WS_MAX_MESSAGE_SIZE);
        ws_config.max_frame_size = Some(WS_MAX_MESSAGE_SIZE);
        let attempt = tokio::time::timeout(
            self.reconnect.connect_timeout,
            tokio_tungstenite::connect_async_with_config(
                self.endpoint.as_str(),
                Some(ws_config),
                false,
            ),
        );

        let (ws_stream, _) = tokio::select! {
            _ = self.cancel.cancelled() => return Err(StreamError::Shutdown),
            res = attempt => {
                res.map_err(|_| StreamError::Timeout(self.reconnect.connect_timeout))??
            }
        };

        // Open is published before the read pump starts so that it precedes
        // the first measurement on the event channel.
        self.set_state(ConnectionState::Open).await;
        info!(endpoint = %self.endpoint, "connected to station");

        let (write, read) = ws_stream.split();
        let (control_tx, control_rx) = mpsc::channel::<tungstenite::Message>(16);
        let cancel = self.cancel.child_token();

        let write_handle = tokio::spawn(write_pump(write, control_rx, cancel.clone()));
        let read_handle = tokio::spawn(read_pump(
            read,
            self.events_tx.clone(),
            control_tx,
            cancel.clone(),
        ));

        Ok(Connection {
            read_handle,
            write_handle,
            cancel,
        })
    }

    /// Runs the connect / receive / reconnect cycle until shutdown.
    ///
    /// Graceful closes, transport errors and failed attempts are handled
    /// the same way: the state goes to `Closed` and exactly one new attempt
    /// is made after the configured delay. There is no attempt limit.
    pub async fn run(&self) {
        let mut attempt: u32 = 0;

        loop {
            match self.connect().await {
                Ok(conn) => {
                    attempt = 0;
                    conn.closed().await;
                    debug!(endpoint = %self.endpoint, "connection closed");
                }
                Err(StreamError::Shutdown) => {}
                Err(e) => {
                    warn!(endpoint = %self.endpoint, error = %e, "connect attempt failed");
                }
            }

            self.set_state(ConnectionState::Closed).await;

            if self.cancel.is_cancelled() {
                break;
            }
            if self.events_tx.is_closed() {
                debug!("event receiver dropped, not reconnecting");
                break;
            }

            attempt = attempt.saturating_add(1);
            let delay = self.reconnect.delay_for_attempt(attempt);
            let _ = self
                .events_tx
                .send(StreamEvent::Reconnecting { attempt, delay })
                .await;
            info!(
                endpoint = %self.endpoint,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "reconnecting"
            );

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!(endpoint = %self.endpoint, "stream client stopped");
    }

    async fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!(from = ?previous, to = ?state, "connection state changed");
        }
        let _ = self.events_tx.send(StreamEvent::StateChanged(state)).await;
    }
}
