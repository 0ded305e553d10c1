use super::*;
use scribble_core::ast::{
    Block, ForStatement, IfStatement, Module, Project, Return, SwitchStatement,
    VariableDeclaration, WhileStatement,
};
use std::cmp::Ordering;

impl Interpreter<'_> {
    /// Imports run depth first, each before the module that imports it, then
    /// the main module. A module already run in this context is not run
    /// again; the main module always runs.
    pub(super) fn eval_project(
        &mut self,
        project: &Project,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let Some(main) = project.module(&project.main_module) else {
            return Err(SyntaxError::new(
                Span::default(),
                ErrorCode::ModuleNotFound,
                format!("project has no module named '{}'", project.main_module),
            ));
        };
        self.eval_imports(project, main, ctx, result)?;
        ctx.mark_evaluated(&project.main_module);
        tracing::debug!(module = %project.main_module, "evaluating main module");
        self.eval(main, ctx, result)
    }

    /// Runs every module `importer` imports, after their own imports. Marking
    /// a module before descending stops cycles.
    fn eval_imports(
        &mut self,
        project: &Project,
        importer: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<(), SyntaxError> {
        for name in imports_of(importer) {
            if name == project.main_module {
                continue;
            }
            let Some(node) = project.module(&name) else {
                continue;
            };
            if !ctx.mark_evaluated(&name) {
                tracing::trace!(module = %name, "module already evaluated");
                continue;
            }
            self.eval_imports(project, node, ctx, result)?;
            tracing::debug!(module = %name, "evaluating imported module");
            self.eval(node, ctx, result)?;
        }
        Ok(())
    }

    /// Module statements run directly in the root scope. `return` ends the
    /// module early and yields its value.
    pub(super) fn eval_module(
        &mut self,
        module: &Module,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let statements = match module.block.as_block() {
            Some(block) => block.statements.as_slice(),
            None => std::slice::from_ref(&module.block),
        };
        let evaluated = self.statements(statements, ctx, result)?;
        Ok(ExpressionResult::new(evaluated.value))
    }

    pub(super) fn eval_block(
        &mut self,
        block: &Block,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        ctx.push_scope();
        let evaluated = self.statements(&block.statements, ctx, result);
        ctx.pop_scope();
        evaluated
    }

    /// Runs statements in order. Yields the last value, or the first result
    /// that leaves with a non-normal flow.
    fn statements(
        &mut self,
        statements: &[Node],
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let mut last = ExpressionResult::new(Value::Null);
        for statement in statements {
            last = self.eval(statement, ctx, result)?;
            if last.flow != Flow::Normal {
                break;
            }
        }
        Ok(last)
    }

    pub(super) fn eval_variable_declaration(
        &mut self,
        decl: &VariableDeclaration,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let Some(variable) = decl.variable.as_variable() else {
            return Err(SyntaxError::new(
                decl.variable.location,
                ErrorCode::UnexpectedNodeType,
                format!("expected Variable, found {}", decl.variable.node_type()),
            ));
        };
        let value = match &decl.initializer {
            Some(initializer) => self.value(initializer, ctx, result)?,
            None => Value::Null,
        };
        ctx.declare(&variable.name, value.clone(), variable.constant)
            .map_err(|fault| fault.at(decl.variable.location))?;
        tracing::trace!(name = %variable.name, constant = variable.constant, "declared");
        Ok(ExpressionResult::new(value))
    }

    fn condition(
        &mut self,
        node: &Node,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Result<bool, SyntaxError> {
        self.value(node, ctx, result)?
            .to_bool()
            .map_err(|fault| fault.at(node.location))
    }

    pub(super) fn eval_if(
        &mut self,
        stmt: &IfStatement,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        for branch in &stmt.branches {
            let NodeKind::Branch(branch) = &branch.kind else {
                return Err(SyntaxError::new(
                    branch.location,
                    ErrorCode::UnexpectedNodeType,
                    format!("expected Branch, found {}", branch.node_type()),
                ));
            };
            if self.condition(&branch.condition, ctx, result)? {
                return self.eval(&branch.statement, ctx, result);
            }
        }
        match &stmt.else_branch {
            Some(statement) => self.eval(statement, ctx, result),
            None => Ok(ExpressionResult::new(Value::Null)),
        }
    }

    pub(super) fn eval_while(
        &mut self,
        stmt: &WhileStatement,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        self.nested(true, |this| -> Eval {
            let mut last = Value::Null;
            while this.condition(&stmt.condition, ctx, result)? {
                let evaluated = this.eval(&stmt.statement, ctx, result)?;
                match evaluated.flow {
                    Flow::Break => break,
                    Flow::Return => return Ok(evaluated),
                    Flow::Continue => {}
                    Flow::Normal => last = evaluated.value,
                }
            }
            Ok(ExpressionResult::new(last))
        })
    }

    /// `for (init; condition; step) statement`, with the header bindings in
    /// a scope of their own. A missing condition loops until `break`.
    pub(super) fn eval_for(
        &mut self,
        stmt: &ForStatement,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        ctx.push_scope();
        let evaluated = self.nested(true, |this| -> Eval {
            if let Some(init) = &stmt.init {
                this.eval(init, ctx, result)?;
            }
            let mut last = Value::Null;
            loop {
                if let Some(condition) = &stmt.condition {
                    if !this.condition(condition, ctx, result)? {
                        break;
                    }
                }
                let evaluated = this.eval(&stmt.statement, ctx, result)?;
                match evaluated.flow {
                    Flow::Break => break,
                    Flow::Return => return Ok(evaluated),
                    Flow::Continue => {}
                    Flow::Normal => last = evaluated.value,
                }
                if let Some(step) = &stmt.step {
                    this.value(step, ctx, result)?;
                }
            }
            Ok(ExpressionResult::new(last))
        });
        ctx.pop_scope();
        evaluated
    }

    /// Runs the first case whose value compares equal to the scrutinee, or
    /// the default. Cases never fall through; `break` leaves the switch.
    pub(super) fn eval_switch(
        &mut self,
        stmt: &SwitchStatement,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let scrutinee = self.value(&stmt.expression, ctx, result)?;
        let mut chosen = None;
        for case in &stmt.cases {
            let NodeKind::CaseStatement(case) = &case.kind else {
                return Err(SyntaxError::new(
                    case.location,
                    ErrorCode::UnexpectedNodeType,
                    format!("expected CaseStatement, found {}", case.node_type()),
                ));
            };
            let value = self.value(&case.value, ctx, result)?;
            if scrutinee.compare(&value) == Ordering::Equal {
                chosen = Some(&case.statement);
                break;
            }
        }
        if chosen.is_none() {
            chosen = stmt.default.as_ref().and_then(|default| match &default.kind {
                NodeKind::DefaultCase(default) => Some(&default.statement),
                _ => None,
            });
        }
        let Some(statement) = chosen else {
            return Ok(ExpressionResult::new(Value::Null));
        };
        let evaluated = self.nested(false, |this| this.eval(statement, ctx, result))?;
        match evaluated.flow {
            Flow::Break => Ok(ExpressionResult::new(evaluated.value)),
            _ => Ok(evaluated),
        }
    }

    pub(super) fn eval_return(
        &mut self,
        ret: &Return,
        ctx: &mut InterpreterContext,
        result: &mut ProcessResult,
    ) -> Eval {
        let value = match &ret.expression {
            Some(expression) => self.value(expression, ctx, result)?,
            None => Value::Null,
        };
        Ok(ExpressionResult::with_flow(value, Flow::Return))
    }

    /// `break` needs an enclosing loop or switch, `continue` a loop.
    pub(super) fn eval_jump(&mut self, node: &Node, flow: Flow) -> Eval {
        let allowed = match flow {
            Flow::Break => self.loops + self.switches > 0,
            _ => self.loops > 0,
        };
        if !allowed {
            let keyword = if flow == Flow::Break { "break" } else { "continue" };
            return Err(SyntaxError::new(
                node.location,
                ErrorCode::MisplacedControlFlow,
                format!("'{keyword}' outside of a loop"),
            ));
        }
        Ok(ExpressionResult::with_flow(Value::Null, flow))
    }
}

/// Module names imported anywhere under `node`, in source order.
fn imports_of(node: &Node) -> Vec<String> {
    let mut names = Vec::new();
    let mut pending = vec![node.clone()];
    while let Some(next) = pending.pop() {
        if let NodeKind::Import(import) = &next.kind {
            if !names.contains(&import.module) {
                names.push(import.module.clone());
            }
        }
        pending.extend(next.children().into_iter().rev());
    }
    names
}
