use super::*;

/// Tracks whether any child came back as a different node.
struct Rebuild<'f, E> {
    map: &'f mut dyn FnMut(&Node) -> Result<Node, E>,
    changed: bool,
}

impl<E> Rebuild<'_, E> {
    fn node(&mut self, node: &Node) -> Result<Node, E> {
        let mapped = (self.map)(node)?;
        if !Arc::ptr_eq(&mapped, node) {
            self.changed = true;
        }
        Ok(mapped)
    }

    fn opt(&mut self, node: &Option<Node>) -> Result<Option<Node>, E> {
        node.as_ref().map(|n| self.node(n)).transpose()
    }

    fn list(&mut self, nodes: &[Node]) -> Result<Vec<Node>, E> {
        nodes.iter().map(|n| self.node(n)).collect()
    }
}

impl NodeKind {
    /// Maps every child through `map`, stopping at the first error.
    ///
    /// Returns `Ok(None)` when every child mapped to the identical node, so
    /// the caller can keep sharing the original.
    pub fn map_children<E>(
        &self,
        map: &mut dyn FnMut(&Node) -> Result<Node, E>,
    ) -> Result<Option<NodeKind>, E> {
        let mut r = Rebuild {
            map,
            changed: false,
        };
        let kind = match self {
            NodeKind::BinaryExpression(expr) => NodeKind::BinaryExpression(BinaryExpression {
                lhs: r.node(&expr.lhs)?,
                op: expr.op,
                rhs: r.node(&expr.rhs)?,
            }),
            NodeKind::UnaryExpression(expr) => NodeKind::UnaryExpression(UnaryExpression {
                op: expr.op,
                operand: r.node(&expr.operand)?,
            }),
            NodeKind::ExpressionList(list) => NodeKind::ExpressionList(ExpressionList {
                expressions: r.list(&list.expressions)?,
            }),
            NodeKind::Block(block) => NodeKind::Block(Block {
                statements: r.list(&block.statements)?,
                closed: block.closed,
            }),
            NodeKind::Module(module) => NodeKind::Module(Module {
                name: module.name.clone(),
                block: r.node(&module.block)?,
                buffer: module.buffer.clone(),
                tokens: module.tokens.clone(),
            }),
            NodeKind::Project(project) => NodeKind::Project(Project {
                main_module: project.main_module.clone(),
                main_buffer: project.main_buffer.clone(),
                modules: r.list(&project.modules)?,
            }),
            NodeKind::VariableDeclaration(decl) => {
                NodeKind::VariableDeclaration(VariableDeclaration {
                    variable: r.node(&decl.variable)?,
                    initializer: r.opt(&decl.initializer)?,
                })
            }
            NodeKind::FunctionDecl(decl) => NodeKind::FunctionDecl(FunctionDecl {
                name: decl.name.clone(),
                parameters: r.list(&decl.parameters)?,
            }),
            NodeKind::FunctionDef(def) => NodeKind::FunctionDef(FunctionDef {
                declaration: r.node(&def.declaration)?,
                body: r.node(&def.body)?,
            }),
            NodeKind::NativeFunctionDecl(decl) => {
                NodeKind::NativeFunctionDecl(NativeFunctionDecl {
                    declaration: r.node(&decl.declaration)?,
                    native_name: decl.native_name.clone(),
                })
            }
            NodeKind::IntrinsicDecl(decl) => NodeKind::IntrinsicDecl(IntrinsicDecl {
                declaration: r.node(&decl.declaration)?,
            }),
            NodeKind::IfStatement(stmt) => NodeKind::IfStatement(IfStatement {
                branches: r.list(&stmt.branches)?,
                else_branch: r.opt(&stmt.else_branch)?,
            }),
            NodeKind::Branch(branch) => NodeKind::Branch(Branch {
                condition: r.node(&branch.condition)?,
                statement: r.node(&branch.statement)?,
            }),
            NodeKind::WhileStatement(stmt) => NodeKind::WhileStatement(WhileStatement {
                condition: r.node(&stmt.condition)?,
                statement: r.node(&stmt.statement)?,
            }),
            NodeKind::ForStatement(stmt) => NodeKind::ForStatement(ForStatement {
                init: r.opt(&stmt.init)?,
                condition: r.opt(&stmt.condition)?,
                step: r.opt(&stmt.step)?,
                statement: r.node(&stmt.statement)?,
            }),
            NodeKind::SwitchStatement(stmt) => NodeKind::SwitchStatement(SwitchStatement {
                expression: r.node(&stmt.expression)?,
                cases: r.list(&stmt.cases)?,
                default: r.opt(&stmt.default)?,
                closed: stmt.closed,
            }),
            NodeKind::CaseStatement(case) => NodeKind::CaseStatement(CaseStatement {
                value: r.node(&case.value)?,
                statement: r.node(&case.statement)?,
            }),
            NodeKind::DefaultCase(case) => NodeKind::DefaultCase(DefaultCase {
                statement: r.node(&case.statement)?,
            }),
            NodeKind::Return(ret) => NodeKind::Return(Return {
                expression: r.opt(&ret.expression)?,
            }),
            NodeKind::ExpressionStatement(stmt) => {
                NodeKind::ExpressionStatement(ExpressionStatement {
                    expression: r.node(&stmt.expression)?,
                })
            }
            NodeKind::Identifier(_)
            | NodeKind::Variable(_)
            | NodeKind::IntegerLiteral(_)
            | NodeKind::FloatLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::CharLiteral(_)
            | NodeKind::BooleanLiteral(_)
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Pass
            | NodeKind::Import(_)
            | NodeKind::ExpressionResult(_)
            | NodeKind::Incomplete(_) => return Ok(None),
        };
        Ok(r.changed.then_some(kind))
    }
}
