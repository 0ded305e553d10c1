//! Scribble language front end: lexer, parser and import resolution.

pub mod context;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod resolver;

pub use context::ParserContext;
pub use loader::{FileSystemLoader, InMemoryLoader, LoadError, SourceLoader};
pub use parser::{parse_expression, parse_module};
pub use resolver::{
    compile_project, compile_project_from_buffer, compile_project_from_buffer_with,
    compile_project_with, Resolver,
};
