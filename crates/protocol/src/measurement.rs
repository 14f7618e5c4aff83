use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::constants::{DATE_FORMAT, TIME_FORMAT};

/// Errors produced while decoding a text frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("frame has neither `tipo`+`quantidade` nor `contagem`")]
    UnknownShape,
}

/// A decoded station reading.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementEvent {
    /// Ultrasonic reading: running count for a named part category.
    CategoryCount { category: String, count: f64 },
    /// Encoder reading: the single running hit count.
    ScalarCount { count: f64 },
}

/// A decoded frame: the event plus the station's wall-clock stamp, if it
/// sent a readable one.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub event: MeasurementEvent,
    pub captured_at: Option<NaiveDateTime>,
}

/// Field-level view of a frame before shape dispatch.
///
/// Shape fields stay untyped until the shape is chosen, so a field outside
/// the chosen shape is ignored like any unknown one. `data`/`hora` never
/// fail the decode.
#[derive(Debug, Deserialize)]
struct RawFrame {
    tipo: Option<Value>,
    quantidade: Option<Value>,
    contagem: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text::deserialize")]
    data: Option<String>,
    #[serde(default, deserialize_with = "lenient_text::deserialize")]
    hora: Option<String>,
}

/// Decodes one text frame.
///
/// A frame carrying both `tipo` and `quantidade` is a category reading, even
/// if it also has `contagem`. Otherwise `contagem` selects the scalar reading.
pub fn decode_frame(text: &str) -> Result<Frame, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    let raw: RawFrame = serde_json::from_value(value)?;

    let event = match (raw.tipo, raw.quantidade, raw.contagem) {
        (Some(category), Some(count), _) => MeasurementEvent::CategoryCount {
            category: serde_json::from_value(category)?,
            count: serde_json::from_value(count)?,
        },
        (_, _, Some(count)) => MeasurementEvent::ScalarCount {
            count: serde_json::from_value(count)?,
        },
        _ => return Err(DecodeError::UnknownShape),
    };

    Ok(Frame {
        event,
        captured_at: parse_stamp(raw.data.as_deref(), raw.hora.as_deref()),
    })
}

fn parse_stamp(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date?, DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time?, TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}

/// Serde module accepting any JSON value and keeping it only if it is a string.
mod lenient_text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Ok(Some(s)),
            _ => Ok(None),
        }
    }
}
