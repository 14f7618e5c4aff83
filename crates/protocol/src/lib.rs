//! Wire protocol for the part-counting station.
//!
//! The station pushes one JSON object per WebSocket text frame. This crate
//! turns those frames into a closed set of [`MeasurementEvent`] variants.

pub mod constants;
pub mod measurement;

pub use measurement::{DecodeError, Frame, MeasurementEvent, decode_frame};
