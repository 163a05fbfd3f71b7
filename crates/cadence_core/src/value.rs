//! Animatable property values
//!
//! Authored values arrive either as bare numbers or as unit strings such as
//! `"12px"`. The numeric magnitude is what interpolation operates on; the
//! unit suffix is reattached to every sampled output.

use std::fmt;

/// Round to two decimal places, the precision handed to the playback layer.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An animatable property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A bare number, e.g. `opacity: 0.5`.
    Number(f64),
    /// A number with a unit suffix, e.g. `width: 12px`.
    Unit { value: f64, unit: String },
    /// Anything non-numeric. Coerces to `NaN` when a magnitude is required.
    Text(String),
}

impl Value {
    /// Parse a raw string into a value.
    ///
    /// A leading numeric literal with a trailing suffix becomes [`Value::Unit`];
    /// a plain numeric literal becomes [`Value::Number`]; everything else is
    /// kept verbatim as [`Value::Text`].
    pub fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        let split = numeric_prefix_len(trimmed);
        if split == 0 {
            return Value::Text(trimmed.to_string());
        }
        let (number, suffix) = trimmed.split_at(split);
        match number.parse::<f64>() {
            Ok(value) if suffix.is_empty() => Value::Number(value),
            Ok(value) => Value::Unit {
                value,
                unit: suffix.to_string(),
            },
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// The numeric magnitude used for interpolation. `NaN` for text values,
    /// which propagates through interpolation unguarded.
    pub fn magnitude(&self) -> f64 {
        match self {
            Value::Number(value) => *value,
            Value::Unit { value, .. } => *value,
            Value::Text(_) => f64::NAN,
        }
    }

    /// The unit suffix, or `""` for unitless values.
    pub fn unit(&self) -> &str {
        match self {
            Value::Unit { unit, .. } => unit,
            _ => "",
        }
    }

    /// Rebuild a sampled magnitude in the shape of this value, reattaching
    /// the unit suffix. Unit magnitudes are rounded to two decimals; bare
    /// numbers keep full precision.
    pub fn reattach(&self, magnitude: f64) -> Value {
        match self {
            Value::Unit { unit, .. } => Value::Unit {
                value: round2(magnitude),
                unit: unit.clone(),
            },
            _ => Value::Number(magnitude),
        }
    }
}

/// Length of the leading numeric literal ("-12.5" in "-12.5px"), 0 if none.
fn numeric_prefix_len(s: &str) -> usize {
    let mut len = 0;
    let mut seen_digit = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => len = i + 1,
            '.' => len = i + 1,
            '0'..='9' => {
                seen_digit = true;
                len = i + 1;
            }
            _ => break,
        }
    }
    if seen_digit {
        len
    } else {
        0
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::parse(raw)
    }
}

impl From<String> for Value {
    fn from(raw: String) -> Self {
        Value::parse(&raw)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{value}"),
            Value::Unit { value, unit } => write!(f, "{}{unit}", round2(*value)),
            Value::Text(text) => write!(f, "{text}"),
        }
    }
}
