use super::{Int, Value};
use crate::error::ErrorCode;

impl Value {
    pub fn add(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => checked(l.checked_add(*r)),
            (Value::Text(l), Value::Text(r)) => Value::Text(format!("{l}{r}")),
            _ => float_op(self, rhs, |l, r| l + r),
        }
    }

    pub fn subtract(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => checked(l.checked_sub(*r)),
            _ => float_op(self, rhs, |l, r| l - r),
        }
    }

    pub fn multiply(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => checked(l.checked_mul(*r)),
            _ => float_op(self, rhs, |l, r| l * r),
        }
    }

    /// Division is always carried out in floating point.
    pub fn divide(&self, rhs: &Value) -> Value {
        match (self.as_number(), rhs.as_number()) {
            (Some(_), Some(r)) if r == 0.0 => Value::Error(ErrorCode::DivisionByZero),
            (Some(l), Some(r)) => Value::Float(l / r),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn modulo(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(_), Value::Integer(r)) if r.is_zero() => {
                Value::Error(ErrorCode::DivisionByZero)
            }
            (Value::Integer(l), Value::Integer(r)) => checked(l.checked_rem(*r)),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn shift_left(&self, rhs: &Value) -> Value {
        shift(self, rhs, Int::checked_shl)
    }

    pub fn shift_right(&self, rhs: &Value) -> Value {
        shift(self, rhs, Int::checked_shr)
    }

    pub fn bitwise_and(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => Value::Integer(l.bitand(*r)),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn bitwise_or(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => Value::Integer(l.bitor(*r)),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn bitwise_not(&self) -> Value {
        match self {
            Value::Integer(int) => Value::Integer(int.not()),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn negate(&self) -> Value {
        match self {
            Value::Integer(int) => checked(int.checked_neg()),
            Value::Float(f) => Value::Float(-f),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    /// Unary plus: numbers pass through unchanged.
    pub fn identity(&self) -> Value {
        match self {
            Value::Integer(_) | Value::Float(_) => self.clone(),
            _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }

    pub fn logical_not(&self) -> Value {
        match self.to_bool() {
            Ok(b) => Value::Boolean(!b),
            Err(_) => Value::Error(ErrorCode::ArgumentTypeMismatch),
        }
    }
}

fn checked(result: Option<Int>) -> Value {
    match result {
        Some(int) => Value::Integer(int),
        None => Value::Error(ErrorCode::IntegerOverflow),
    }
}

fn float_op(lhs: &Value, rhs: &Value, op: impl Fn(f64, f64) -> f64) -> Value {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(l), Some(r)) => Value::Float(op(l, r)),
        _ => Value::Error(ErrorCode::ArgumentTypeMismatch),
    }
}

fn shift(lhs: &Value, rhs: &Value, op: impl Fn(Int, u32) -> Option<Int>) -> Value {
    let (Value::Integer(value), Value::Integer(amount)) = (lhs, rhs) else {
        return Value::Error(ErrorCode::ArgumentTypeMismatch);
    };
    let Some(amount) = amount.to_i64().and_then(|a| u32::try_from(a).ok()) else {
        return Value::Error(ErrorCode::IntegerOverflow);
    };
    checked(op(*value, amount))
}
