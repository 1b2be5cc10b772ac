//! Conversion of raw token text into typed values.

use serde::Serialize;
use thiserror::Error;

use crate::ValueType;

/// A value produced by converting raw token text against a [`ValueType`].
///
/// Serializes untagged, so `TypedValue::Integer(3)` becomes `3` in JSON and
/// [`TypedValue::Unit`] becomes `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Values of a multi-valued option or a variadic argument.
    List(Vec<TypedValue>),
    /// An optional-value option that was given without a value.
    Unit,
}

impl TypedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Raw text could not be converted to the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{value}' to {target}: {reason}")]
pub struct ConversionError {
    /// The offending raw text.
    pub value: String,
    /// Name of the target type.
    pub target: String,
    /// Why conversion failed.
    pub reason: String,
}

impl ConversionError {
    fn new(value: &str, target: &ValueType, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            target: target.name().to_string(),
            reason: reason.into(),
        }
    }
}

impl ValueType {
    /// Converts raw token text into a [`TypedValue`].
    ///
    /// Booleans accept `true/false`, `yes/no`, `on/off` and `1/0` in any
    /// case. Enum constants match exactly first, then case-insensitively;
    /// the canonical constant is returned either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::{TypedValue, ValueType};
    ///
    /// assert_eq!(ValueType::Integer.convert("42").unwrap(), TypedValue::Integer(42));
    /// assert_eq!(ValueType::Bool.convert("Yes").unwrap(), TypedValue::Bool(true));
    ///
    /// let colors = ValueType::Enum(vec!["RED".into(), "GREEN".into()]);
    /// assert_eq!(colors.convert("green").unwrap(), TypedValue::String("GREEN".into()));
    /// assert!(colors.convert("blue").is_err());
    /// ```
    pub fn convert(&self, raw: &str) -> Result<TypedValue, ConversionError> {
        match self {
            ValueType::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(TypedValue::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(TypedValue::Bool(false)),
                _ => Err(ConversionError::new(raw, self, "not a boolean")),
            },
            ValueType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|e| ConversionError::new(raw, self, e.to_string())),
            ValueType::Float => {
                let parsed = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| ConversionError::new(raw, self, e.to_string()))?;
                if parsed.is_nan() {
                    return Err(ConversionError::new(raw, self, "not a number"));
                }
                Ok(TypedValue::Float(parsed))
            }
            ValueType::Enum(constants) => {
                if let Some(exact) = constants.iter().find(|c| c.as_str() == raw) {
                    return Ok(TypedValue::String(exact.clone()));
                }
                let mut folded = constants.iter().filter(|c| c.eq_ignore_ascii_case(raw));
                match (folded.next(), folded.next()) {
                    (Some(only), None) => Ok(TypedValue::String(only.clone())),
                    (Some(_), Some(_)) => Err(ConversionError::new(
                        raw,
                        self,
                        "ambiguous constant, use exact case",
                    )),
                    _ => Err(ConversionError::new(
                        raw,
                        self,
                        format!("expected one of {}", constants.join(", ")),
                    )),
                }
            }
            ValueType::String | ValueType::Any => Ok(TypedValue::String(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_spellings() {
        for raw in ["true", "TRUE", "yes", "on", "1"] {
            assert_eq!(ValueType::Bool.convert(raw).unwrap(), TypedValue::Bool(true));
        }
        for raw in ["false", "No", "off", "0"] {
            assert_eq!(
                ValueType::Bool.convert(raw).unwrap(),
                TypedValue::Bool(false)
            );
        }
        assert!(ValueType::Bool.convert("maybe").is_err());
    }

    #[test]
    fn test_integer_and_float() {
        assert_eq!(
            ValueType::Integer.convert("-17").unwrap(),
            TypedValue::Integer(-17)
        );
        let err = ValueType::Integer.convert("abc").unwrap_err();
        assert_eq!(err.value, "abc");
        assert_eq!(err.target, "integer");

        assert_eq!(
            ValueType::Float.convert("2.5").unwrap(),
            TypedValue::Float(2.5)
        );
        assert!(ValueType::Float.convert("NaN").is_err());
    }

    #[test]
    fn test_enum_exact_before_folded() {
        let vt = ValueType::Enum(vec!["on".into(), "ON".into(), "Off".into()]);
        assert_eq!(vt.convert("ON").unwrap(), TypedValue::String("ON".into()));
        assert_eq!(vt.convert("off").unwrap(), TypedValue::String("Off".into()));
        assert!(vt.convert("On").is_err());
    }

    #[test]
    fn test_any_keeps_text() {
        assert_eq!(
            ValueType::Any.convert(" spaced ").unwrap(),
            TypedValue::String(" spaced ".into())
        );
    }

    #[test]
    fn test_typed_value_serializes_untagged() {
        let list = TypedValue::List(vec![TypedValue::Integer(1), TypedValue::Unit]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[1,null]");
    }
}
