use super::*;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter, Write};

const INDENT: &str = "    ";

/// Source-like rendering. Binary and unary expressions are fully
/// parenthesised so the output parses back to the same tree shape.
impl Display for SyntaxNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            out: String::new(),
            depth: 0,
        };
        printer.node(self)?;
        f.write_str(&printer.out)
    }
}

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn indent(&mut self) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }

    fn statements(&mut self, statements: &[Node]) -> fmt::Result {
        for stmt in statements {
            self.indent()?;
            self.node(stmt)?;
            self.out.write_char('\n')?;
        }
        Ok(())
    }

    fn signature(&mut self, declaration: &Node) -> fmt::Result {
        match declaration.as_function_decl() {
            Some(decl) => self.function_decl(decl),
            None => self.node(declaration),
        }
    }

    fn function_decl(&mut self, decl: &FunctionDecl) -> fmt::Result {
        write!(
            self.out,
            "func {}({})",
            decl.name,
            decl.parameter_names().iter().join(", ")
        )
    }

    fn node(&mut self, node: &SyntaxNode) -> fmt::Result {
        match &node.kind {
            NodeKind::Identifier(ident) => self.out.write_str(&ident.name),
            NodeKind::Variable(variable) => self.out.write_str(&variable.name),
            NodeKind::BinaryExpression(expr) => match expr.op {
                Operator::Member => {
                    self.node(&expr.lhs)?;
                    self.out.write_char('.')?;
                    self.node(&expr.rhs)
                }
                Operator::Call => {
                    self.node(&expr.lhs)?;
                    self.out.write_char('(')?;
                    self.node(&expr.rhs)?;
                    self.out.write_char(')')
                }
                Operator::Subscript => {
                    self.node(&expr.lhs)?;
                    self.out.write_char('[')?;
                    self.node(&expr.rhs)?;
                    self.out.write_char(']')
                }
                op => {
                    self.out.write_char('(')?;
                    self.node(&expr.lhs)?;
                    write!(self.out, " {op} ")?;
                    self.node(&expr.rhs)?;
                    self.out.write_char(')')
                }
            },
            NodeKind::UnaryExpression(expr) => {
                write!(self.out, "({}", expr.op)?;
                self.node(&expr.operand)?;
                self.out.write_char(')')
            }
            NodeKind::IntegerLiteral(int) => write!(self.out, "{int}"),
            NodeKind::FloatLiteral(value) => write!(self.out, "{value:?}"),
            NodeKind::StringLiteral(text) => write!(self.out, "\"{}\"", escape(text, '"')),
            NodeKind::CharLiteral(ch) => {
                write!(self.out, "'{}'", escape(&ch.to_string(), '\''))
            }
            NodeKind::BooleanLiteral(b) => write!(self.out, "{b}"),
            NodeKind::ExpressionList(list) => {
                for (idx, expr) in list.expressions.iter().enumerate() {
                    if idx > 0 {
                        self.out.write_str(", ")?;
                    }
                    self.node(expr)?;
                }
                Ok(())
            }
            NodeKind::Block(block) => {
                self.out.write_str("{\n")?;
                self.depth += 1;
                self.statements(&block.statements)?;
                self.depth -= 1;
                self.indent()?;
                self.out.write_char('}')
            }
            NodeKind::Module(module) => match module.block.as_block() {
                Some(block) => self.statements(&block.statements),
                None => self.node(&module.block),
            },
            NodeKind::Project(project) => {
                for module in &project.modules {
                    if let Some(m) = module.as_module() {
                        writeln!(self.out, "// module {}", m.name)?;
                    }
                    self.node(module)?;
                }
                Ok(())
            }
            NodeKind::VariableDeclaration(decl) => {
                let (keyword, name) = match decl.variable.as_variable() {
                    Some(var) if var.constant => ("const", var.name.as_str()),
                    Some(var) => ("var", var.name.as_str()),
                    None => ("var", "?"),
                };
                write!(self.out, "{keyword} {name}")?;
                if let Some(init) = &decl.initializer {
                    self.out.write_str(" = ")?;
                    self.node(init)?;
                }
                self.out.write_char(';')
            }
            NodeKind::FunctionDecl(decl) => {
                self.function_decl(decl)?;
                self.out.write_char(';')
            }
            NodeKind::FunctionDef(def) => {
                self.signature(&def.declaration)?;
                self.out.write_char(' ')?;
                self.node(&def.body)
            }
            NodeKind::NativeFunctionDecl(decl) => {
                self.signature(&decl.declaration)?;
                write!(self.out, " -> \"{}\";", escape(&decl.native_name, '"'))
            }
            NodeKind::IntrinsicDecl(decl) => {
                self.signature(&decl.declaration)?;
                self.out.write_str(" intrinsic;")
            }
            NodeKind::IfStatement(stmt) => {
                for (idx, branch) in stmt.branches.iter().enumerate() {
                    if idx > 0 {
                        self.out.write_str(" el")?;
                    }
                    self.node(branch)?;
                }
                if let Some(else_branch) = &stmt.else_branch {
                    self.out.write_str(" else ")?;
                    self.node(else_branch)?;
                }
                Ok(())
            }
            NodeKind::Branch(branch) => {
                self.out.write_str("if ")?;
                self.node(&branch.condition)?;
                self.out.write_char(' ')?;
                self.node(&branch.statement)
            }
            NodeKind::WhileStatement(stmt) => {
                self.out.write_str("while (")?;
                self.node(&stmt.condition)?;
                self.out.write_str(") ")?;
                self.node(&stmt.statement)
            }
            NodeKind::ForStatement(stmt) => {
                self.out.write_str("for (")?;
                match &stmt.init {
                    Some(init) => self.node(init)?,
                    None => self.out.write_char(';')?,
                }
                if let Some(condition) = &stmt.condition {
                    self.out.write_char(' ')?;
                    self.node(condition)?;
                }
                self.out.write_char(';')?;
                if let Some(step) = &stmt.step {
                    self.out.write_char(' ')?;
                    self.node(step)?;
                }
                self.out.write_str(") ")?;
                self.node(&stmt.statement)
            }
            NodeKind::SwitchStatement(stmt) => {
                self.out.write_str("switch ")?;
                self.node(&stmt.expression)?;
                self.out.write_str(" {\n")?;
                self.depth += 1;
                self.statements(&stmt.cases)?;
                if let Some(default) = &stmt.default {
                    self.statements(std::slice::from_ref(default))?;
                }
                self.depth -= 1;
                self.indent()?;
                self.out.write_char('}')
            }
            NodeKind::CaseStatement(case) => {
                self.out.write_str("case ")?;
                self.node(&case.value)?;
                self.out.write_str(": ")?;
                self.node(&case.statement)
            }
            NodeKind::DefaultCase(case) => {
                self.out.write_str("default: ")?;
                self.node(&case.statement)
            }
            NodeKind::Return(ret) => {
                self.out.write_str("return")?;
                if let Some(expr) = &ret.expression {
                    self.out.write_char(' ')?;
                    self.node(expr)?;
                }
                self.out.write_char(';')
            }
            NodeKind::Break => self.out.write_str("break;"),
            NodeKind::Continue => self.out.write_str("continue;"),
            NodeKind::Pass => self.out.write_char(';'),
            NodeKind::Import(import) => write!(self.out, "import {};", import.path.join("/")),
            NodeKind::ExpressionStatement(stmt) => {
                self.node(&stmt.expression)?;
                self.out.write_char(';')
            }
            NodeKind::ExpressionResult(result) => write!(self.out, "{}", result.value),
            NodeKind::Incomplete(incomplete) => {
                write!(self.out, "<incomplete: expected {}>", incomplete.expected)
            }
        }
    }
}

fn escape(text: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            '\\' => escaped.push_str("\\\\"),
            c if c == quote => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}
