//! Core data model of the Scribble scripting language: source spans,
//! diagnostics, the syntax tree, runtime values, the host command bridge and
//! the generic tree processor shared by resolution and interpretation.

pub mod ast;
pub mod command;
pub mod diagnostics;
pub mod error;
pub mod processor;
pub mod span;
pub mod token;
pub mod value;

// Re-export commonly used items for convenience
pub use tracing;

pub use ast::{Node, NodeKind, NodeType, SyntaxNode};
pub use diagnostics::ProcessResult;
pub use error::{ErrorCode, Fault, SyntaxError};
pub use span::Span;
pub use value::Value;

pub type Result<T> = crate::error::Result<T>;
