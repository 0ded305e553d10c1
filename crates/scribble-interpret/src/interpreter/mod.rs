//! Tree-walking evaluator. Every handled node evaluates to an
//! `ExpressionResult` node holding its value and how control left it.

mod call;
mod eval_expr;
mod eval_stmt;

use crate::context::InterpreterContext;
use scribble_core::ast::{ExpressionResult, Flow, Node, NodeKind, NodeType, SyntaxNode};
use scribble_core::command::CommandRegistry;
use scribble_core::diagnostics::ProcessResult;
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::processor::{process_as, Processor, Step};
use scribble_core::span::Span;
use scribble_core::value::Value;
use std::sync::Arc;

pub(crate) type Eval = Result<ExpressionResult, SyntaxError>;

pub struct Interpreter<'r> {
    registry: &'r CommandRegistry,
    /// Loops enclosing the current statement within the current call.
    loops: usize,
    /// Switches enclosing the current statement within the current call.
    switches: usize,
}

impl<'r> Interpreter<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self {
            registry,
            loops: 0,
            switches: 0,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    /// Evaluates `node` and unwraps the resulting `ExpressionResult`.
    fn eval(
        &mut self,
        node: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let evaluated = process_as(self, node, ctx, result, NodeType::ExpressionResult)?;
        evaluated
            .as_expression_result()
            .cloned()
            .ok_or_else(|| SyntaxError::from_code(evaluated.location, ErrorCode::InternalError))
    }

    fn value(
        &mut self,
        node: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        self.eval(node, ctx, result).map(|evaluated| evaluated.value)
    }

    /// Runs `body` with one more enclosing loop (or switch) on record.
    fn nested<T>(&mut self, is_loop: bool, body: impl FnOnce(&mut Self) -> T) -> T {
        if is_loop {
            self.loops += 1;
        } else {
            self.switches += 1;
        }
        let outcome = body(self);
        if is_loop {
            self.loops -= 1;
        } else {
            self.switches -= 1;
        }
        outcome
    }
}

impl Processor for Interpreter<'_> {
    type Context = InterpreterContext;

    fn name(&self) -> &str {
        "interpret"
    }

    fn handle(
        &mut self,
        node: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Option<Step> {
        let evaluated = match &node.kind {
            // Argument lists are rebuilt structurally, one result per element.
            NodeKind::ExpressionList(_) => return None,
            NodeKind::ExpressionResult(_) => return Some(Ok(Arc::clone(node))),

            NodeKind::Project(project) => self.eval_project(project, ctx, result),
            NodeKind::Module(module) => self.eval_module(module, ctx, result),
            NodeKind::Block(block) => self.eval_block(block, ctx, result),
            NodeKind::VariableDeclaration(decl) => self.eval_variable_declaration(decl, ctx, result),
            NodeKind::FunctionDecl(_) | NodeKind::Pass | NodeKind::Import(_) => {
                Ok(ExpressionResult::new(Value::Null))
            }
            NodeKind::FunctionDef(def) => self.eval_function_def(node, def, ctx),
            NodeKind::NativeFunctionDecl(decl) => self.eval_native_decl(node, decl, ctx),
            NodeKind::IntrinsicDecl(decl) => self.eval_intrinsic_decl(node, decl, ctx),
            NodeKind::IfStatement(stmt) => self.eval_if(stmt, ctx, result),
            NodeKind::WhileStatement(stmt) => self.eval_while(stmt, ctx, result),
            NodeKind::ForStatement(stmt) => self.eval_for(stmt, ctx, result),
            NodeKind::SwitchStatement(stmt) => self.eval_switch(stmt, ctx, result),
            NodeKind::Return(ret) => self.eval_return(ret, ctx, result),
            NodeKind::Break => self.eval_jump(node, Flow::Break),
            NodeKind::Continue => self.eval_jump(node, Flow::Continue),
            NodeKind::ExpressionStatement(stmt) => self
                .value(&stmt.expression, ctx, result)
                .map(ExpressionResult::new),

            NodeKind::Identifier(ident) => self
                .eval_identifier(node, &ident.name, ctx)
                .map(ExpressionResult::new),
            NodeKind::IntegerLiteral(int) => Ok(ExpressionResult::new(Value::Integer(*int))),
            NodeKind::FloatLiteral(float) => Ok(ExpressionResult::new(Value::Float(*float))),
            NodeKind::StringLiteral(text) => Ok(ExpressionResult::new(Value::text(text.as_str()))),
            NodeKind::CharLiteral(ch) => Ok(ExpressionResult::new(Value::text(ch.to_string()))),
            NodeKind::BooleanLiteral(b) => Ok(ExpressionResult::new(Value::Boolean(*b))),
            NodeKind::UnaryExpression(expr) => self
                .eval_unary(node, expr, ctx, result)
                .map(ExpressionResult::new),
            NodeKind::BinaryExpression(expr) => self
                .eval_binary(node, expr, ctx, result)
                .map(ExpressionResult::new),

            NodeKind::Incomplete(incomplete) => Err(SyntaxError::new(
                node.location,
                ErrorCode::UnexpectedEndOfInput,
                format!("cannot evaluate incomplete input: {}", incomplete.expected),
            )),
            NodeKind::Variable(_)
            | NodeKind::Branch(_)
            | NodeKind::CaseStatement(_)
            | NodeKind::DefaultCase(_) => Err(SyntaxError::new(
                node.location,
                ErrorCode::UnexpectedNodeType,
                format!("{} cannot be evaluated on its own", node.node_type()),
            )),
        };
        Some(evaluated.map(|evaluated| evaluated_node(node.location, evaluated)))
    }
}

fn evaluated_node(location: Span, evaluated: ExpressionResult) -> Node {
    SyntaxNode::node(location, NodeKind::ExpressionResult(evaluated))
}

/// Turns an error-typed value from the value layer into a located diagnostic.
fn located(value: Value, location: Span, what: impl FnOnce() -> String) -> Result<Value, SyntaxError> {
    match value.error_code() {
        Some(code) => Err(SyntaxError::new(
            location,
            code,
            format!("{} in {}", code.description(), what()),
        )),
        None => Ok(value),
    }
}
