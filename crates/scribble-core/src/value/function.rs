use super::Intrinsic;
use crate::ast::Node;
use crate::command::CommandAdapter;
use itertools::Itertools;

/// Anything a script can call.
#[derive(Debug, Clone)]
pub enum Function {
    /// A function defined in script text.
    Scribble(ScribbleFunction),
    /// A host command reached through the string-typed command bridge.
    Command(CommandAdapter),
    /// A built-in bound with `func name(..) intrinsic;`.
    Intrinsic(Intrinsic),
}

impl Function {
    pub fn name(&self) -> &str {
        match self {
            Function::Scribble(function) => &function.name,
            Function::Command(adapter) => adapter.name(),
            Function::Intrinsic(intrinsic) => intrinsic.name(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Scribble(function) => function.parameters.len(),
            Function::Command(adapter) => adapter.parameters().len(),
            Function::Intrinsic(intrinsic) => intrinsic.arity(),
        }
    }

    pub fn parameter_names(&self) -> Vec<String> {
        match self {
            Function::Scribble(function) => function.parameters.clone(),
            Function::Command(adapter) => adapter
                .parameters()
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            Function::Intrinsic(intrinsic) => (0..intrinsic.arity())
                .map(|idx| format!("arg{idx}"))
                .collect(),
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "func {}({})",
            self.name(),
            self.parameter_names().iter().join(", ")
        )
    }
}

/// A function whose body is a parsed statement.
#[derive(Debug, Clone)]
pub struct ScribbleFunction {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Node,
}

impl ScribbleFunction {
    pub fn new(name: impl Into<String>, parameters: Vec<String>, body: Node) -> Self {
        Self {
            name: name.into(),
            parameters,
            body,
        }
    }
}
