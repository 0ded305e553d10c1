use super::*;
use scribble_core::ast::{BinaryExpression, FunctionDecl, FunctionDef, IntrinsicDecl, NativeFunctionDecl};
use scribble_core::value::{Function, Intrinsic, ScribbleFunction};

impl Interpreter<'_> {
    /// Evaluates an `ExpressionList` through the structural fallback and
    /// collects the element values.
    pub(super) fn arguments(
        &mut self,
        list: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Vec<Value>, SyntaxError> {
        let evaluated = process_as(self, list, ctx, result, NodeType::ExpressionList)?;
        let Some(list) = evaluated.as_expression_list() else {
            return Err(SyntaxError::from_code(evaluated.location, ErrorCode::InternalError));
        };
        list.expressions
            .iter()
            .map(|element| {
                element
                    .as_expression_result()
                    .map(|evaluated| evaluated.value.clone())
                    .ok_or_else(|| {
                        SyntaxError::new(
                            element.location,
                            ErrorCode::UnexpectedNodeType,
                            format!("expected ExpressionResult, found {}", element.node_type()),
                        )
                    })
            })
            .collect()
    }

    pub(super) fn eval_call(
        &mut self,
        node: &Node,
        expr: &BinaryExpression,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        let callee = self.value(&expr.lhs, ctx, result)?;
        let Some(function) = callee.as_function().cloned() else {
            return Err(SyntaxError::new(
                expr.lhs.location,
                ErrorCode::NotCallable,
                format!("a value of type {} is not callable", callee.value_type()),
            ));
        };
        let args = self.arguments(&expr.rhs, ctx, result)?;
        self.call(&function, args, node.location, ctx, result)
    }

    pub(crate) fn call(
        &mut self,
        function: &Function,
        args: Vec<Value>,
        location: Span,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        tracing::debug!(function = function.name(), args = args.len(), "call");
        match function {
            Function::Scribble(function) => self.call_scribble(function, args, location, ctx, result),
            Function::Command(adapter) => adapter.call(&args).map_err(|fault| fault.at(location)),
            Function::Intrinsic(intrinsic) => {
                intrinsic.call(&args).map_err(|fault| fault.at(location))
            }
        }
    }

    /// Runs the body in a fresh frame holding only the parameters. Loop and
    /// switch nesting of the caller does not carry into the callee.
    fn call_scribble(
        &mut self,
        function: &ScribbleFunction,
        args: Vec<Value>,
        location: Span,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        if args.len() != function.parameters.len() {
            return Err(SyntaxError::new(
                location,
                ErrorCode::ArgumentCountMismatch,
                format!(
                    "'{}' expects {} argument(s), got {}",
                    function.name,
                    function.parameters.len(),
                    args.len()
                ),
            ));
        }

        let enclosing = (self.loops, self.switches);
        (self.loops, self.switches) = (0, 0);
        ctx.push_frame();
        let outcome = self.bind_and_run(function, args, location, ctx, result);
        ctx.pop_frame();
        (self.loops, self.switches) = enclosing;
        outcome
    }

    fn bind_and_run(
        &mut self,
        function: &ScribbleFunction,
        args: Vec<Value>,
        location: Span,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<Value, SyntaxError> {
        for (parameter, arg) in function.parameters.iter().zip(args) {
            ctx.declare(parameter, arg, false).map_err(|fault| {
                SyntaxError::new(
                    location,
                    ErrorCode::ExecutionError,
                    format!("binding '{parameter}' of '{}': {fault}", function.name),
                )
            })?;
        }
        // The body's last value doubles as the return value.
        let evaluated = self.eval(&function.body, ctx, result)?;
        Ok(evaluated.value)
    }

    pub(super) fn eval_function_def(
        &mut self,
        node: &Node,
        def: &FunctionDef,
        ctx: &mut InterpreterContext,
    ) -> Eval {
        let decl = declaration(&def.declaration)?;
        let function = Function::Scribble(ScribbleFunction::new(
            decl.name.as_str(),
            decl.parameter_names(),
            Arc::clone(&def.body),
        ));
        bind_function(node, &decl.name, function, ctx)
    }

    /// `func name(params) -> "command";`
    pub(super) fn eval_native_decl(
        &mut self,
        node: &Node,
        native: &NativeFunctionDecl,
        ctx: &mut InterpreterContext,
    ) -> Eval {
        let decl = declaration(&native.declaration)?;
        let Some(adapter) = self.registry.adapter(&native.native_name) else {
            return Err(SyntaxError::new(
                node.location,
                ErrorCode::UndeclaredCommand,
                format!("no host command named '{}'", native.native_name),
            ));
        };
        if adapter.parameters().len() != decl.parameters.len() {
            return Err(SyntaxError::new(
                node.location,
                ErrorCode::ArgumentCountMismatch,
                format!(
                    "command '{}' takes {} argument(s) but '{}' declares {}",
                    native.native_name,
                    adapter.parameters().len(),
                    decl.name,
                    decl.parameters.len()
                ),
            ));
        }
        bind_function(node, &decl.name, Function::Command(adapter), ctx)
    }

    /// `func name(params) intrinsic;`
    pub(super) fn eval_intrinsic_decl(
        &mut self,
        node: &Node,
        intrinsic: &IntrinsicDecl,
        ctx: &mut InterpreterContext,
    ) -> Eval {
        let decl = declaration(&intrinsic.declaration)?;
        let Some(builtin) = Intrinsic::from_name(&decl.name) else {
            return Err(SyntaxError::new(
                node.location,
                ErrorCode::UnknownIntrinsic,
                format!("no intrinsic named '{}'", decl.name),
            ));
        };
        if builtin.arity() != decl.parameters.len() {
            return Err(SyntaxError::new(
                node.location,
                ErrorCode::ArgumentCountMismatch,
                format!(
                    "intrinsic '{}' takes {} argument(s), declared with {}",
                    decl.name,
                    builtin.arity(),
                    decl.parameters.len()
                ),
            ));
        }
        bind_function(node, &decl.name, Function::Intrinsic(builtin), ctx)
    }
}

fn declaration(node: &Node) -> Result<&FunctionDecl, SyntaxError> {
    node.as_function_decl().ok_or_else(|| {
        SyntaxError::new(
            node.location,
            ErrorCode::UnexpectedNodeType,
            format!("expected FunctionDecl, found {}", node.node_type()),
        )
    })
}

fn bind_function(node: &Node, name: &str, function: Function, ctx: &mut InterpreterContext) -> Eval {
    let value = Value::function(function);
    ctx.declare(name, value.clone(), false)
        .map_err(|fault| fault.at(node.location))?;
    tracing::trace!(function = name, "declared function");
    Ok(ExpressionResult::new(value))
}
