//! Streaming client for the part-counting station.
//!
//! Keeps a single WebSocket connection open to the station, decodes each
//! text frame into a measurement, and reconnects after a fixed delay
//! whenever the connection closes for any reason.

pub mod client;
mod pumps;
pub mod types;

pub use client::{StreamClient, StreamError};
pub use types::{ConnectionState, ReconnectConfig, StreamEvent};
