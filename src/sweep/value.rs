//! Type-erased hyperparameter atoms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One opaque hyperparameter value: integer, float, boolean, or string.
///
/// Serializes untagged, so persisted artifacts carry the bare literal
/// (`1000`, `0.01`, `true`, `"normal"`) rather than an enum wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer-valued parameter (batch size, worker count, ...)
    Int(i64),
    /// Float-valued parameter (learning rate, momentum, ...)
    Float(f64),
    /// Boolean flag (shuffle, pin memory, ...)
    Bool(bool),
    /// Free-form string (dataset variant, device name, ...)
    Str(String),
}

impl ParamValue {
    /// Integer payload, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float payload; an `Int` widens to float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_literal() {
        assert_eq!(ParamValue::Int(1000).to_string(), "1000");
        assert_eq!(ParamValue::Float(0.01).to_string(), "0.01");
        assert_eq!(ParamValue::Bool(true).to_string(), "true");
        assert_eq!(ParamValue::Str("normal".into()).to_string(), "normal");
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ParamValue::Int(1000)).unwrap(), "1000");
        assert_eq!(serde_json::to_string(&ParamValue::Float(0.01)).unwrap(), "0.01");
        assert_eq!(serde_json::to_string(&ParamValue::Bool(false)).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&ParamValue::Str("normal".into())).unwrap(),
            "\"normal\""
        );
    }

    #[test]
    fn test_deserializes_by_shape() {
        assert_eq!(serde_json::from_str::<ParamValue>("2000").unwrap(), ParamValue::Int(2000));
        assert_eq!(serde_json::from_str::<ParamValue>("0.5").unwrap(), ParamValue::Float(0.5));
        assert_eq!(serde_json::from_str::<ParamValue>("true").unwrap(), ParamValue::Bool(true));
        assert_eq!(
            serde_json::from_str::<ParamValue>("\"cuda\"").unwrap(),
            ParamValue::Str("cuda".into())
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ParamValue::Int(7).as_int(), Some(7));
        assert_eq!(ParamValue::Int(7).as_float(), Some(7.0));
        assert_eq!(ParamValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(ParamValue::Float(0.5).as_int(), None);
        assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ParamValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(ParamValue::Str("x".into()).as_bool(), None);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(ParamValue::from(1000), ParamValue::Int(1000));
        assert_eq!(ParamValue::from(0.01), ParamValue::Float(0.01));
        assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
        assert_eq!(ParamValue::from("cpu"), ParamValue::Str("cpu".into()));
        assert_eq!(ParamValue::from(String::from("cpu")), ParamValue::Str("cpu".into()));
    }
}
