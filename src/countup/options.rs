//! Options accepted by a count-up binding.
//!
//! Options are decoded permissively: a missing field, a `null`, or a value
//! of the wrong kind takes the field's default instead of failing. Numeric
//! fields also accept numeric strings such as `"42.5"`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::animation::{Easing, Tween};
use crate::layout::Insets;

/// Default animation length in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Largest supported number of fractional digits.
pub const MAX_DECIMALS: usize = 100;

/// Error decoding an options expression.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("count-up options are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("count-up options must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// Configuration of one count-up binding, fixed once bound.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountUpOptions {
    /// Value shown at the start of the animation
    #[serde(deserialize_with = "number_or_zero")]
    pub start: f64,
    /// Value the animation lands on
    #[serde(deserialize_with = "number_or_zero")]
    pub end: f64,
    /// Length of the animation in milliseconds
    #[serde(rename = "duration", deserialize_with = "duration_or_default")]
    pub duration_ms: f64,
    /// Pixels the element must travel past the bottom of the viewport
    /// before the animation starts
    #[serde(rename = "tolerance", deserialize_with = "number_or_zero")]
    pub tolerance_px: f64,
    pub easing: Easing,
    /// Fixed number of fractional digits
    #[serde(deserialize_with = "decimals_or_zero")]
    pub decimals: usize,
    #[serde(deserialize_with = "text_or_empty")]
    pub prefix: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub suffix: String,
}

impl Default for CountUpOptions {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            duration_ms: DEFAULT_DURATION_MS,
            tolerance_px: 0.0,
            easing: Easing::Linear,
            decimals: 0,
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl CountUpOptions {
    /// Options counting from zero up to `end`.
    pub fn to(end: f64) -> Self {
        Self {
            end,
            ..Self::default()
        }
    }

    /// Decode options from a JSON object such as
    /// `{"end": 1500, "duration": 800, "easing": "ease-out"}`.
    pub fn from_json(expression: &str) -> Result<Self, OptionsError> {
        let value: Value = serde_json::from_str(expression)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, OptionsError> {
        let kind = match &value {
            Value::Object(_) => None,
            Value::Null => Some("null"),
            Value::Bool(_) => Some("a boolean"),
            Value::Number(_) => Some("a number"),
            Value::String(_) => Some("a string"),
            Value::Array(_) => Some("an array"),
        };
        if let Some(kind) = kind {
            return Err(OptionsError::NotAnObject(kind));
        }
        if value.get("end").is_none() {
            log::debug!("count-up options without `end`, counting to 0");
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: f64) -> Self {
        self.end = end;
        self
    }

    /// Set the duration in milliseconds
    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the viewport tolerance in pixels
    pub fn tolerance(mut self, tolerance_px: f64) -> Self {
        self.tolerance_px = tolerance_px;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals.min(MAX_DECIMALS);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn tween(&self) -> Tween {
        Tween::new(self.start, self.end, self.duration_ms).easing(self.easing)
    }

    /// Root margin for the visibility watch: the bottom edge of the viewport
    /// pulled in by the tolerance.
    pub fn root_margin(&self) -> Insets {
        Insets::bottom_tolerance(self.tolerance_px as f32)
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| !n.is_nan())
}

fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or_else(|| {
        if !value.is_null() {
            log::debug!("ignoring non-numeric option value {}", value);
        }
        0.0
    }))
}

fn duration_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value).unwrap_or(DEFAULT_DURATION_MS))
}

fn decimals_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let decimals = lenient_number(&value).unwrap_or(0.0);
    if decimals.is_finite() && decimals > 0.0 {
        Ok((decimals.trunc() as usize).min(MAX_DECIMALS))
    } else {
        Ok(0)
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
