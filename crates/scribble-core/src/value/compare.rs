use super::Value;
use std::cmp::Ordering;
use std::sync::Arc;

impl Value {
    /// Total ordering used by the comparison operators and `switch`.
    ///
    /// `Null` sorts before everything else. Otherwise the right operand is
    /// coerced to the representation of the left one; when that coercion
    /// fails the pair compares as [`Ordering::Greater`]. An integer compared
    /// with a float is compared numerically rather than truncating the float.
    pub fn compare(&self, rhs: &Value) -> Ordering {
        match (self, rhs) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Integer(l), Value::Float(r)) => {
                l.to_f64().partial_cmp(r).unwrap_or(Ordering::Greater)
            }
            (Value::Integer(l), _) => match rhs.to_int() {
                Ok(r) => l.cmp(&r),
                Err(_) => Ordering::Greater,
            },
            (Value::Float(l), _) => match rhs.to_float() {
                Ok(r) => l.partial_cmp(&r).unwrap_or(Ordering::Greater),
                Err(_) => Ordering::Greater,
            },
            (Value::Text(_), Value::Function(_) | Value::Error(_)) => Ordering::Greater,
            (Value::Text(l), _) => l.as_str().cmp(rhs.to_string().as_str()),
            (Value::Boolean(l), _) => match rhs.to_bool() {
                Ok(r) => l.cmp(&r),
                Err(_) => Ordering::Greater,
            },
            (Value::Error(l), Value::Error(r)) if l == r => Ordering::Equal,
            (Value::Function(l), Value::Function(r)) if Arc::ptr_eq(l, r) => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn null_sorts_first() {
        assert_eq!(Value::Null.compare(&Value::int(0)), Ordering::Less);
        assert_eq!(Value::int(0).compare(&Value::Null), Ordering::Greater);
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn right_operand_is_coerced_to_left() {
        assert_eq!(Value::int(10).compare(&Value::text("10")), Ordering::Equal);
        // text on the left compares lexically
        assert_eq!(Value::text("10").compare(&Value::int(9)), Ordering::Less);
        assert_eq!(Value::text("10").compare(&Value::int(10)), Ordering::Equal);
        assert_eq!(Value::Float(1.5).compare(&Value::int(2)), Ordering::Less);
        assert_eq!(Value::int(2).compare(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Boolean(true).compare(&Value::int(1)), Ordering::Equal);
    }

    #[test]
    fn incomparable_pairs_are_greater() {
        assert_eq!(Value::int(1).compare(&Value::text("one")), Ordering::Greater);
        assert_eq!(
            Value::Error(ErrorCode::IntegerOverflow).compare(&Value::int(1)),
            Ordering::Greater
        );
        assert_eq!(
            Value::text("x").compare(&Value::Error(ErrorCode::IntegerOverflow)),
            Ordering::Greater
        );
    }
}
