//! Runtime values of the Scribble interpreter.
//!
//! A [`Value`] is a small tagged union. Arithmetic never traps: overflow,
//! division by zero and type mismatches produce a [`Value::Error`] carrying
//! the matching [`ErrorCode`].

mod arith;
mod compare;
mod function;
mod int;
mod intrinsic;

pub use function::*;
pub use int::*;
pub use intrinsic::*;

use crate::error::{ErrorCode, Fault};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Integer(Int),
    Float(f64),
    Boolean(bool),
    Error(ErrorCode),
    Function(Arc<Function>),
}

/// Tag of a [`Value`], used in diagnostics and by the `typeof` intrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValueType {
    #[display("null")]
    Null,
    #[display("text")]
    Text,
    #[display("integer")]
    Integer,
    #[display("float")]
    Float,
    #[display("boolean")]
    Boolean,
    #[display("error")]
    Error,
    #[display("function")]
    Function,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn int(value: i64) -> Self {
        Value::Integer(Int::Signed(value))
    }

    pub fn unsigned(value: u64) -> Self {
        Value::Integer(Int::from_u64(value))
    }

    pub fn function(function: Function) -> Self {
        Value::Function(Arc::new(function))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Text(_) => ValueType::Text,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Error(_) => ValueType::Error,
            Value::Function(_) => ValueType::Function,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Value::Error(code) => Some(*code),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Arc<Function>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Converts an error value into a [`Fault`]; every other value passes through.
    pub fn into_result(self) -> Result<Value, Fault> {
        match self {
            Value::Error(code) => Err(Fault::from(code)),
            other => Ok(other),
        }
    }

    pub fn to_int(&self) -> Result<Int, Fault> {
        match self {
            Value::Integer(int) => Ok(*int),
            Value::Float(f) => {
                if f.is_finite() && *f >= i64::MIN as f64 && *f <= u64::MAX as f64 {
                    Int::from_i128(f.trunc() as i128, false)
                        .ok_or_else(|| Fault::from(ErrorCode::IntegerOverflow))
                } else {
                    Err(Fault::new(
                        ErrorCode::ConversionError,
                        format!("{f} cannot be converted to an integer"),
                    ))
                }
            }
            Value::Boolean(b) => Ok(Int::Signed(*b as i64)),
            Value::Text(text) => parse_int(text.trim()).ok_or_else(|| {
                Fault::new(
                    ErrorCode::ConversionError,
                    format!("'{text}' is not an integer"),
                )
            }),
            other => Err(conversion_fault(other, ValueType::Integer)),
        }
    }

    pub fn to_float(&self) -> Result<f64, Fault> {
        match self {
            Value::Integer(int) => Ok(int.to_f64()),
            Value::Float(f) => Ok(*f),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                Fault::new(ErrorCode::ConversionError, format!("'{text}' is not a number"))
            }),
            other => Err(conversion_fault(other, ValueType::Float)),
        }
    }

    pub fn to_bool(&self) -> Result<bool, Fault> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(int) => Ok(!int.is_zero()),
            Value::Float(f) => Ok(*f != 0.0),
            Value::Text(text) => match text.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(Fault::new(
                    ErrorCode::ConversionError,
                    format!("'{text}' is not a boolean"),
                )),
            },
            Value::Null => Ok(false),
            other => Err(conversion_fault(other, ValueType::Boolean)),
        }
    }

    /// Numeric view used by the arithmetic fallbacks: only numbers qualify.
    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(int) => Some(int.to_f64()),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

fn conversion_fault(value: &Value, target: ValueType) -> Fault {
    Fault::new(
        ErrorCode::ConversionError,
        format!("{} cannot be converted to {}", value.value_type(), target),
    )
}

fn parse_int(text: &str) -> Option<Int> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(Int::from_u64);
    }
    if let Some(digits) = text.strip_prefix('-') {
        return digits
            .parse::<u64>()
            .ok()
            .and_then(|magnitude| Int::from_i128(-(magnitude as i128), false));
    }
    text.parse::<u64>().ok().map(Int::from_u64)
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(int) => write!(f, "{int}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Error(code) => write!(f, "error: {}", code.description()),
            Value::Function(function) => write!(f, "{function}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(l), Value::Text(r)) => l == r,
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l == r,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Error(l), Value::Error(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => Arc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<ErrorCode> for Value {
    fn from(code: ErrorCode) -> Self {
        Value::Error(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_are_fallible() {
        assert_eq!(Value::text("42").to_int(), Ok(Int::Signed(42)));
        assert_eq!(Value::text("-7").to_int(), Ok(Int::Signed(-7)));
        assert_eq!(Value::Float(3.9).to_int(), Ok(Int::Signed(3)));
        assert!(Value::text("forty").to_int().is_err());
        assert!(Value::Null.to_float().is_err());
        assert_eq!(Value::text("true").to_bool(), Ok(true));
        assert_eq!(Value::int(0).to_bool(), Ok(false));
    }

    #[test]
    fn display_keeps_float_point() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::int(-12).to_string(), "-12");
        assert_eq!(Value::text("hi").to_string(), "hi");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
