use chrono::{DateTime, TimeZone, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{PlotScaleError, Result};

/// A single channel value.
///
/// This is the engine's scalar model: channels deliver sequences of these,
/// domains and ranges are stored as vectors of these, and `apply`/`invert`
/// consume and produce them. Numbers are wrapped in `OrderedFloat` so that
/// scalar values are hashable and totally comparable (ordinal domain
/// deduplication relies on this).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Number(OrderedFloat<f64>),
    Date(DateTime<Utc>),
    String(String),
}

impl ScalarValue {
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    pub fn string<S: Into<String>>(value: S) -> Self {
        Self::String(value.into())
    }

    /// Builds a UTC date value from epoch milliseconds.
    pub fn date_from_millis(millis: i64) -> Self {
        Self::Date(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for values that belong to a discrete (ordinal) domain: strings
    /// and booleans. Numbers and dates are continuous kinds.
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::String(_) | Self::Boolean(_))
    }

    /// Lenient numeric view: numbers as-is, booleans as 0/1, dates as epoch
    /// milliseconds, numeric strings parsed. `None` for anything else.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v.into_inner()),
            Self::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Date(v) => Some(v.timestamp_millis() as f64),
            Self::String(v) => v.parse::<f64>().ok(),
            Self::Null => None,
        }
    }

    /// Strict numeric coercion, failing with an internal error on
    /// non-numeric values.
    pub fn to_numeric(&self) -> Result<f64> {
        self.as_f64().ok_or_else(|| {
            PlotScaleError::internal(format!("expected numeric scalar value, received {self:?}"))
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::number(value as f64)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::number(value as f64)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}
