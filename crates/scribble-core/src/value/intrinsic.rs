use super::Value;
use crate::error::{ErrorCode, Fault};
use std::cmp::Ordering;

/// Built-in functions a module can bind with an intrinsic declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Len,
    Str,
    Int,
    Float,
    Bool,
    TypeOf,
    Abs,
    Min,
    Max,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 9] = [
        Intrinsic::Len,
        Intrinsic::Str,
        Intrinsic::Int,
        Intrinsic::Float,
        Intrinsic::Bool,
        Intrinsic::TypeOf,
        Intrinsic::Abs,
        Intrinsic::Min,
        Intrinsic::Max,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intrinsic| intrinsic.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Len => "len",
            Intrinsic::Str => "str",
            Intrinsic::Int => "int",
            Intrinsic::Float => "float",
            Intrinsic::Bool => "bool",
            Intrinsic::TypeOf => "typeof",
            Intrinsic::Abs => "abs",
            Intrinsic::Min => "min",
            Intrinsic::Max => "max",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Intrinsic::Min | Intrinsic::Max => 2,
            _ => 1,
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Fault> {
        if args.len() != self.arity() {
            return Err(Fault::new(
                ErrorCode::ArgumentCountMismatch,
                format!(
                    "{} expects {} argument(s), got {}",
                    self.name(),
                    self.arity(),
                    args.len()
                ),
            ));
        }
        let value = match self {
            Intrinsic::Len => match &args[0] {
                Value::Text(text) => Value::unsigned(text.chars().count() as u64),
                other => return Err(mismatch(self, other)),
            },
            Intrinsic::Str => Value::Text(args[0].to_string()),
            Intrinsic::Int => Value::Integer(args[0].to_int()?),
            Intrinsic::Float => Value::Float(args[0].to_float()?),
            Intrinsic::Bool => Value::Boolean(args[0].to_bool()?),
            Intrinsic::TypeOf => Value::Text(args[0].value_type().to_string()),
            Intrinsic::Abs => match &args[0] {
                Value::Integer(int) if int.widen() < 0 => args[0].negate(),
                Value::Integer(_) => args[0].clone(),
                Value::Float(f) => Value::Float(f.abs()),
                other => return Err(mismatch(self, other)),
            },
            Intrinsic::Min => pick(&args[0], &args[1], Ordering::Greater),
            Intrinsic::Max => pick(&args[0], &args[1], Ordering::Less),
        };
        value.into_result()
    }
}

fn pick(lhs: &Value, rhs: &Value, replace_when: Ordering) -> Value {
    if lhs.compare(rhs) == replace_when {
        rhs.clone()
    } else {
        lhs.clone()
    }
}

fn mismatch(intrinsic: &Intrinsic, value: &Value) -> Fault {
    Fault::new(
        ErrorCode::ArgumentTypeMismatch,
        format!("{} does not accept a {} argument", intrinsic.name(), value.value_type()),
    )
}
