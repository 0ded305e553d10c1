use super::*;
use scribble_core::ast::{BinaryExpression, Operator, UnaryExpression};
use scribble_core::value::Function;
use std::cmp::Ordering;

impl Interpreter<'_> {
    /// Context chain first, then the host command registry.
    pub(super) fn eval_identifier(
        &mut self,
        node: &Node,
        name: &str,
        ctx: &InterpreterContext,
    ) -> Result<Value, SyntaxError> {
        if let Some(value) = ctx.get(name) {
            return Ok(value);
        }
        if let Some(adapter) = self.registry.adapter(name) {
            tracing::trace!(command = name, "identifier resolved to host command");
            return Ok(Value::function(Function::Command(adapter)));
        }
        Err(SyntaxError::new(
            node.location,
            ErrorCode::UndeclaredVariable,
            format!("'{name}' is not declared"),
        ))
    }

    pub(super) fn eval_unary(
        &mut self,
        node: &Node,
        expr: &UnaryExpression,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        let operand = self.value(&expr.operand, ctx, result)?;
        let value = match expr.op {
            Operator::Negate => operand.negate(),
            Operator::Identity => operand.identity(),
            Operator::LogicalNot => operand.logical_not(),
            Operator::BitwiseNot => operand.bitwise_not(),
            op => return Err(not_an_operator(node, op, "prefix")),
        };
        located(value, node.location, || {
            format!("'{}{}'", expr.op, operand.value_type())
        })
    }

    pub(super) fn eval_binary(
        &mut self,
        node: &Node,
        expr: &BinaryExpression,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        match expr.op {
            Operator::Assign => {
                let name = assignment_target(&expr.lhs)?;
                let value = self.value(&expr.rhs, ctx, result)?;
                ctx.set(name, value.clone())
                    .map_err(|fault| fault.at(expr.lhs.location))?;
                Ok(value)
            }
            op if op.is_assignment() => self.eval_compound_assignment(node, expr, ctx, result),
            Operator::LogicalAnd | Operator::LogicalOr => {
                let lhs = self.condition_of(&expr.lhs, ctx, result)?;
                let short_circuit = (expr.op == Operator::LogicalOr) == lhs;
                if short_circuit {
                    return Ok(Value::Boolean(lhs));
                }
                self.condition_of(&expr.rhs, ctx, result).map(Value::Boolean)
            }
            Operator::Member => self.eval_member(expr, ctx),
            Operator::Call => self.eval_call(node, expr, ctx, result),
            Operator::Subscript => self.eval_subscript(expr, ctx, result),
            op => {
                let lhs = self.value(&expr.lhs, ctx, result)?;
                let rhs = self.value(&expr.rhs, ctx, result)?;
                let value = apply(op, &lhs, &rhs).ok_or_else(|| not_an_operator(node, op, "binary"))?;
                located(value, node.location, || {
                    format!("'{} {op} {}'", lhs.value_type(), rhs.value_type())
                })
            }
        }
    }

    /// `x op= y` reads `x`, applies `op` and writes the result back.
    fn eval_compound_assignment(
        &mut self,
        node: &Node,
        expr: &BinaryExpression,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        let name = assignment_target(&expr.lhs)?;
        let Some(current) = ctx.get(name) else {
            return Err(SyntaxError::new(
                expr.lhs.location,
                ErrorCode::UndeclaredVariable,
                format!("'{name}' is not declared"),
            ));
        };
        let rhs = self.value(&expr.rhs, ctx, result)?;
        let base = expr
            .op
            .compound_base()
            .ok_or_else(|| not_an_operator(node, expr.op, "assignment"))?;
        let value = apply(base, &current, &rhs).ok_or_else(|| not_an_operator(node, base, "binary"))?;
        let value = located(value, node.location, || {
            format!("'{} {} {}'", current.value_type(), expr.op, rhs.value_type())
        })?;
        ctx.set(name, value.clone())
            .map_err(|fault| fault.at(expr.lhs.location))?;
        Ok(value)
    }

    fn condition_of(
        &mut self,
        node: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<bool, SyntaxError> {
        self.value(node, ctx, result)?
            .to_bool()
            .map_err(|fault| fault.at(node.location))
    }

    /// `module.name`: the qualifier must name an evaluated module, written
    /// with `.` for `/` or as the last path segment. The member is then
    /// looked up among the global bindings. Modules share one root scope, so
    /// `lib.x` also finds an `x` declared by main or by any other module.
    fn eval_member(
        &mut self,
        expr: &BinaryExpression,
        ctx: &InterpreterContext,
    ) -> Result<Value, SyntaxError> {
        let Some(qualifier) = qualified_name(&expr.lhs) else {
            return Err(SyntaxError::new(
                expr.lhs.location,
                ErrorCode::UnexpectedNodeType,
                format!("expected a module name, found {}", expr.lhs.node_type()),
            ));
        };
        let Some(member) = expr.rhs.as_identifier() else {
            return Err(SyntaxError::new(
                expr.rhs.location,
                ErrorCode::UnexpectedNodeType,
                format!("expected an identifier, found {}", expr.rhs.node_type()),
            ));
        };
        if !ctx.modules().any(|module| names_module(&qualifier, module)) {
            return Err(SyntaxError::new(
                expr.lhs.location,
                ErrorCode::UndeclaredVariable,
                format!("no module named '{qualifier}'"),
            ));
        }
        ctx.global_binding(&member.name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| {
                SyntaxError::new(
                    expr.rhs.location,
                    ErrorCode::UndeclaredVariable,
                    format!("'{qualifier}.{}' is not declared", member.name),
                )
            })
    }

    /// Indexes text by character position.
    fn eval_subscript(
        &mut self,
        expr: &BinaryExpression,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        let target = self.value(&expr.lhs, ctx, result)?;
        let indices = self.arguments(&expr.rhs, ctx, result)?;
        let [index] = indices.as_slice() else {
            return Err(SyntaxError::new(
                expr.rhs.location,
                ErrorCode::ArgumentCountMismatch,
                format!("subscript takes exactly one index, got {}", indices.len()),
            ));
        };
        let Value::Text(text) = &target else {
            return Err(SyntaxError::new(
                expr.lhs.location,
                ErrorCode::ArgumentTypeMismatch,
                format!("cannot index a value of type {}", target.value_type()),
            ));
        };
        let position = index.to_int().map_err(|fault| fault.at(expr.rhs.location))?;
        position
            .to_i64()
            .and_then(|position| usize::try_from(position).ok())
            .and_then(|position| text.chars().nth(position))
            .map(|ch| Value::text(ch.to_string()))
            .ok_or_else(|| {
                SyntaxError::new(
                    expr.rhs.location,
                    ErrorCode::IndexOutOfRange,
                    format!(
                        "index {position} is out of range for text of length {}",
                        text.chars().count()
                    ),
                )
            })
    }
}

/// The binary operators that act on two evaluated operands.
fn apply(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    let value = match op {
        Operator::Add => lhs.add(rhs),
        Operator::Subtract => lhs.subtract(rhs),
        Operator::Multiply => lhs.multiply(rhs),
        Operator::Divide => lhs.divide(rhs),
        Operator::Modulo => lhs.modulo(rhs),
        Operator::ShiftLeft => lhs.shift_left(rhs),
        Operator::ShiftRight => lhs.shift_right(rhs),
        Operator::BitwiseAnd => lhs.bitwise_and(rhs),
        Operator::BitwiseOr => lhs.bitwise_or(rhs),
        Operator::Equals => Value::Boolean(lhs.compare(rhs) == Ordering::Equal),
        Operator::NotEquals => Value::Boolean(lhs.compare(rhs) != Ordering::Equal),
        Operator::Less => Value::Boolean(lhs.compare(rhs) == Ordering::Less),
        Operator::LessEquals => Value::Boolean(lhs.compare(rhs) != Ordering::Greater),
        Operator::Greater => Value::Boolean(lhs.compare(rhs) == Ordering::Greater),
        Operator::GreaterEquals => Value::Boolean(lhs.compare(rhs) != Ordering::Less),
        _ => return None,
    };
    Some(value)
}

fn assignment_target(lhs: &Node) -> Result<&str, SyntaxError> {
    lhs.as_identifier()
        .map(|ident| ident.name.as_str())
        .ok_or_else(|| {
            SyntaxError::new(
                lhs.location,
                ErrorCode::CannotAssignToRValue,
                format!("cannot assign to {}", lhs.node_type()),
            )
        })
}

/// `a`, `a.b`, `a.b.c` as a dotted path; anything else is not a name.
fn qualified_name(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Identifier(ident) => Some(ident.name.clone()),
        NodeKind::BinaryExpression(expr) if expr.op == Operator::Member => {
            let head = qualified_name(&expr.lhs)?;
            let tail = expr.rhs.as_identifier()?;
            Some(format!("{head}.{}", tail.name))
        }
        _ => None,
    }
}

fn names_module(qualifier: &str, module: &str) -> bool {
    let dotted = module.replace('/', ".");
    qualifier == dotted || module.rsplit('/').next() == Some(qualifier)
}

fn not_an_operator(node: &Node, op: Operator, position: &str) -> SyntaxError {
    SyntaxError::new(
        node.location,
        ErrorCode::InternalError,
        format!("'{op}' is not a {position} operator"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_names_match_dotted_path_or_last_segment() {
        assert!(names_module("util.strings", "util/strings"));
        assert!(names_module("strings", "util/strings"));
        assert!(names_module("main", "main"));
        assert!(!names_module("util", "util/strings"));
        assert!(!names_module("other", "util/strings"));
    }

    #[test]
    fn comparisons_follow_value_ordering() {
        let one = Value::int(1);
        let two = Value::int(2);
        assert_eq!(apply(Operator::Less, &one, &two), Some(Value::Boolean(true)));
        assert_eq!(apply(Operator::GreaterEquals, &one, &two), Some(Value::Boolean(false)));
        assert_eq!(apply(Operator::Equals, &one, &Value::Float(1.0)), Some(Value::Boolean(true)));
        assert_eq!(apply(Operator::Call, &one, &two), None);
    }
}
