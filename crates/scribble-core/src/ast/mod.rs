//! Syntax trees are immutable and shared: passes build new nodes and reuse
//! every subtree they did not replace.

mod ops;
mod pretty;
mod rebuild;

pub use ops::*;

use crate::span::Span;
use crate::token::Token;
use crate::value::{Int, Value};
use std::sync::Arc;

pub type Node = Arc<SyntaxNode>;

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub location: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NodeType {
    Identifier,
    Variable,
    BinaryExpression,
    UnaryExpression,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    BooleanLiteral,
    ExpressionList,
    Block,
    Module,
    Project,
    VariableDeclaration,
    FunctionDecl,
    FunctionDef,
    NativeFunctionDecl,
    IntrinsicDecl,
    IfStatement,
    Branch,
    WhileStatement,
    ForStatement,
    SwitchStatement,
    CaseStatement,
    DefaultCase,
    Return,
    Break,
    Continue,
    Pass,
    Import,
    ExpressionStatement,
    ExpressionResult,
    Incomplete,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Identifier(Identifier),
    Variable(Variable),
    BinaryExpression(BinaryExpression),
    UnaryExpression(UnaryExpression),
    IntegerLiteral(Int),
    FloatLiteral(f64),
    StringLiteral(String),
    CharLiteral(char),
    BooleanLiteral(bool),
    ExpressionList(ExpressionList),
    Block(Block),
    Module(Module),
    Project(Project),
    VariableDeclaration(VariableDeclaration),
    FunctionDecl(FunctionDecl),
    FunctionDef(FunctionDef),
    NativeFunctionDecl(NativeFunctionDecl),
    IntrinsicDecl(IntrinsicDecl),
    IfStatement(IfStatement),
    Branch(Branch),
    WhileStatement(WhileStatement),
    ForStatement(ForStatement),
    SwitchStatement(SwitchStatement),
    CaseStatement(CaseStatement),
    DefaultCase(DefaultCase),
    Return(Return),
    Break,
    Continue,
    Pass,
    Import(Import),
    ExpressionStatement(ExpressionStatement),
    /// Produced by the interpreter only.
    ExpressionResult(ExpressionResult),
    /// Placeholder for a construct cut short by the end of the input.
    Incomplete(Incomplete),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
}

/// A binding introduced by a declaration or a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub constant: bool,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub lhs: Node,
    pub op: Operator,
    pub rhs: Node,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub op: Operator,
    pub operand: Node,
}

#[derive(Debug, Clone)]
pub struct ExpressionList {
    pub expressions: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Node>,
    /// False when the input ended before the closing brace.
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub block: Node,
    pub buffer: Arc<str>,
    pub tokens: Option<Arc<Vec<Token>>>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub main_module: String,
    pub main_buffer: Arc<str>,
    pub modules: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub variable: Node,
    pub initializer: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub declaration: Node,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct NativeFunctionDecl {
    pub declaration: Node,
    pub native_name: String,
}

#[derive(Debug, Clone)]
pub struct IntrinsicDecl {
    pub declaration: Node,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub branches: Vec<Node>,
    pub else_branch: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct Branch {
    pub condition: Node,
    pub statement: Node,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Node,
    pub statement: Node,
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub init: Option<Node>,
    pub condition: Option<Node>,
    pub step: Option<Node>,
    pub statement: Node,
}

#[derive(Debug, Clone)]
pub struct SwitchStatement {
    pub expression: Node,
    pub cases: Vec<Node>,
    pub default: Option<Node>,
    pub closed: bool,
}

#[derive(Debug, Clone)]
pub struct CaseStatement {
    pub value: Node,
    pub statement: Node,
}

#[derive(Debug, Clone)]
pub struct DefaultCase {
    pub statement: Node,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub expression: Option<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Path segments as written, `a/b` is `["a", "b"]`.
    pub path: Vec<String>,
    /// Sanitized module name used for resolution.
    pub module: String,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Node,
}

/// How evaluation left a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Normal,
    Return,
    Break,
    Continue,
}

#[derive(Debug, Clone)]
pub struct ExpressionResult {
    pub value: Value,
    pub flow: Flow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incomplete {
    pub expected: String,
}

impl SyntaxNode {
    pub fn new(location: Span, kind: NodeKind) -> Self {
        Self { location, kind }
    }

    pub fn node(location: Span, kind: NodeKind) -> Node {
        Arc::new(Self::new(location, kind))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Identifier(_) => NodeType::Identifier,
            NodeKind::Variable(_) => NodeType::Variable,
            NodeKind::BinaryExpression(_) => NodeType::BinaryExpression,
            NodeKind::UnaryExpression(_) => NodeType::UnaryExpression,
            NodeKind::IntegerLiteral(_) => NodeType::IntegerLiteral,
            NodeKind::FloatLiteral(_) => NodeType::FloatLiteral,
            NodeKind::StringLiteral(_) => NodeType::StringLiteral,
            NodeKind::CharLiteral(_) => NodeType::CharLiteral,
            NodeKind::BooleanLiteral(_) => NodeType::BooleanLiteral,
            NodeKind::ExpressionList(_) => NodeType::ExpressionList,
            NodeKind::Block(_) => NodeType::Block,
            NodeKind::Module(_) => NodeType::Module,
            NodeKind::Project(_) => NodeType::Project,
            NodeKind::VariableDeclaration(_) => NodeType::VariableDeclaration,
            NodeKind::FunctionDecl(_) => NodeType::FunctionDecl,
            NodeKind::FunctionDef(_) => NodeType::FunctionDef,
            NodeKind::NativeFunctionDecl(_) => NodeType::NativeFunctionDecl,
            NodeKind::IntrinsicDecl(_) => NodeType::IntrinsicDecl,
            NodeKind::IfStatement(_) => NodeType::IfStatement,
            NodeKind::Branch(_) => NodeType::Branch,
            NodeKind::WhileStatement(_) => NodeType::WhileStatement,
            NodeKind::ForStatement(_) => NodeType::ForStatement,
            NodeKind::SwitchStatement(_) => NodeType::SwitchStatement,
            NodeKind::CaseStatement(_) => NodeType::CaseStatement,
            NodeKind::DefaultCase(_) => NodeType::DefaultCase,
            NodeKind::Return(_) => NodeType::Return,
            NodeKind::Break => NodeType::Break,
            NodeKind::Continue => NodeType::Continue,
            NodeKind::Pass => NodeType::Pass,
            NodeKind::Import(_) => NodeType::Import,
            NodeKind::ExpressionStatement(_) => NodeType::ExpressionStatement,
            NodeKind::ExpressionResult(_) => NodeType::ExpressionResult,
            NodeKind::Incomplete(_) => NodeType::Incomplete,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self.node_type(),
            NodeType::Identifier
                | NodeType::Variable
                | NodeType::BinaryExpression
                | NodeType::UnaryExpression
                | NodeType::IntegerLiteral
                | NodeType::FloatLiteral
                | NodeType::StringLiteral
                | NodeType::CharLiteral
                | NodeType::BooleanLiteral
                | NodeType::ExpressionList
                | NodeType::ExpressionResult
        )
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<Node> {
        let mut children = Vec::new();
        match &self.kind {
            NodeKind::BinaryExpression(expr) => {
                children.push(expr.lhs.clone());
                children.push(expr.rhs.clone());
            }
            NodeKind::UnaryExpression(expr) => children.push(expr.operand.clone()),
            NodeKind::ExpressionList(list) => children.extend(list.expressions.iter().cloned()),
            NodeKind::Block(block) => children.extend(block.statements.iter().cloned()),
            NodeKind::Module(module) => children.push(module.block.clone()),
            NodeKind::Project(project) => children.extend(project.modules.iter().cloned()),
            NodeKind::VariableDeclaration(decl) => {
                children.push(decl.variable.clone());
                children.extend(decl.initializer.iter().cloned());
            }
            NodeKind::FunctionDecl(decl) => children.extend(decl.parameters.iter().cloned()),
            NodeKind::FunctionDef(def) => {
                children.push(def.declaration.clone());
                children.push(def.body.clone());
            }
            NodeKind::NativeFunctionDecl(decl) => children.push(decl.declaration.clone()),
            NodeKind::IntrinsicDecl(decl) => children.push(decl.declaration.clone()),
            NodeKind::IfStatement(stmt) => {
                children.extend(stmt.branches.iter().cloned());
                children.extend(stmt.else_branch.iter().cloned());
            }
            NodeKind::Branch(branch) => {
                children.push(branch.condition.clone());
                children.push(branch.statement.clone());
            }
            NodeKind::WhileStatement(stmt) => {
                children.push(stmt.condition.clone());
                children.push(stmt.statement.clone());
            }
            NodeKind::ForStatement(stmt) => {
                children.extend(stmt.init.iter().cloned());
                children.extend(stmt.condition.iter().cloned());
                children.extend(stmt.step.iter().cloned());
                children.push(stmt.statement.clone());
            }
            NodeKind::SwitchStatement(stmt) => {
                children.push(stmt.expression.clone());
                children.extend(stmt.cases.iter().cloned());
                children.extend(stmt.default.iter().cloned());
            }
            NodeKind::CaseStatement(case) => {
                children.push(case.value.clone());
                children.push(case.statement.clone());
            }
            NodeKind::DefaultCase(case) => children.push(case.statement.clone()),
            NodeKind::Return(ret) => children.extend(ret.expression.iter().cloned()),
            NodeKind::ExpressionStatement(stmt) => children.push(stmt.expression.clone()),
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
            | NodeKind::Incomplete(_) => {}
        }
        children
    }

    /// True when the subtree was fully formed before the input ran out.
    /// Interactive front ends use this to decide whether to submit.
    pub fn is_complete(&self) -> bool {
        match &self.kind {
            NodeKind::Incomplete(_) => false,
            NodeKind::Block(block) if !block.closed => false,
            NodeKind::SwitchStatement(stmt) if !stmt.closed => false,
            _ => self.children().iter().all(|child| child.is_complete()),
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match &self.kind {
            NodeKind::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            NodeKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            NodeKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&Module> {
        match &self.kind {
            NodeKind::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match &self.kind {
            NodeKind::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn as_function_decl(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            NodeKind::FunctionDecl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_expression_list(&self) -> Option<&ExpressionList> {
        match &self.kind {
            NodeKind::ExpressionList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_expression_result(&self) -> Option<&ExpressionResult> {
        match &self.kind {
            NodeKind::ExpressionResult(result) => Some(result),
            _ => None,
        }
    }
}

impl Project {
    pub fn module(&self, name: &str) -> Option<&Node> {
        self.modules
            .iter()
            .find(|node| node.as_module().map(|m| m.name == name).unwrap_or(false))
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules
            .iter()
            .filter_map(|node| node.as_module().map(|m| m.name.clone()))
            .collect()
    }
}

impl FunctionDecl {
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter_map(|param| param.as_variable().map(|v| v.name.clone()))
            .collect()
    }
}

impl ExpressionResult {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            flow: Flow::Normal,
        }
    }

    pub fn with_flow(value: Value, flow: Flow) -> Self {
        Self { value, flow }
    }
}
