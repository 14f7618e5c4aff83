use std::time::Duration;

/// Address of the station in the reference deployment.
pub const DEFAULT_ENDPOINT: &str = "ws://192.168.43.186:8080";

/// Fixed delay between a closed connection and the next connect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Upper bound on a single connect attempt (TCP + WebSocket handshake).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum accepted WebSocket message size (64 KB).
///
/// The station itself refuses frames over 1 KB, so anything near this
/// limit is not a measurement.
pub const WS_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Date format of the `data` field (`dd/mm/yyyy`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Time format of the `hora` field (`HH:MM:SS`).
pub const TIME_FORMAT: &str = "%H:%M:%S";
