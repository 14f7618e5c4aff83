//! Public types for the streaming client.

use std::time::Duration;

use partcount_protocol::Frame;
use partcount_protocol::constants::{CONNECT_TIMEOUT, RECONNECT_DELAY};

/// Lifecycle of the (single) station connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// TCP connect + WebSocket handshake in progress.
    Connecting,
    /// Handshake completed; frames are flowing.
    Open,
    /// Connection ended (graceful close, error, or failed attempt).
    Closed,
}

/// Events emitted by [`StreamClient`](crate::StreamClient), in the order
/// they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The connection moved to a new state.
    StateChanged(ConnectionState),
    /// A reconnect is scheduled after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    /// A frame decoded into a measurement.
    Measurement(Frame),
}

/// Reconnection policy: a fixed delay, unbounded attempts.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Wait between a closed connection and the next connect attempt.
    pub delay: Duration,
    /// Upper bound on a single connect attempt.
    pub connect_timeout: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay: RECONNECT_DELAY,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl ReconnectConfig {
    /// A config with the given delay and the default connect timeout.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Delay before the given attempt (1-based). Constant: no backoff, no
    /// jitter.
    pub fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        self.delay
    }
}
