use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use crate::domain::OrderedMap;

/// The flattened properties of a model.
pub type PropertyMap = OrderedMap<Value>;

/// A projected property value.
///
/// Primitives and atomic values are stored as-is. Anything else a model
/// exposes is expanded into a nested [`PropertyMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The property was present but had no value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer too large for [`Value::Int`].
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// A high-precision decimal.
    Decimal(Decimal),
    /// A unique identifier.
    Uuid(Uuid),
    /// An absolute point in time.
    Timestamp(DateTime<Utc>),
    /// A span of time.
    Duration(TimeDelta),
    /// An absolute URI.
    Uri(Url),
    /// A nested model.
    Map(PropertyMap),
    /// A nested sequence.
    List(Vec<Value>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The nested map, if this value is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The text, if this value is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Formats a span as `[-][d.]hh:mm:ss[.fffffff]`, with sub-second precision
/// in 100ns ticks.
#[must_use]
pub fn format_duration(duration: TimeDelta) -> String {
    let sign = if duration < TimeDelta::zero() { "-" } else { "" };
    let duration = duration.abs();

    let total_seconds = duration.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let ticks = duration.subsec_nanos() / 100;

    let mut formatted = String::from(sign);
    if days > 0 {
        formatted.push_str(&format!("{days}."));
    }
    formatted.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        formatted.push_str(&format!(".{ticks:07}"));
    }
    formatted
}
