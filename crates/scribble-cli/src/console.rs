//! Line-oriented console driver.
//!
//! Input accumulates until it parses as a complete module; only then is it
//! compiled and evaluated. Each submission is one of three outcomes, which
//! front ends render differently.

use crate::diagnostics::SourceMap;
use scribble_core::command::CommandRegistry;
use scribble_core::error::SyntaxError;
use scribble_core::value::Value;
use scribble_interpret::{interpret_in, InterpreterContext};
use scribble_lang::{compile_project_from_buffer_with, parse_module, ParserContext, SourceLoader};
use std::sync::Arc;
use tracing::debug;

/// Module name console submissions are compiled under.
pub const CONSOLE_MODULE: &str = "console";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleOutcome {
    /// The statement is not finished; input is kept for the next line.
    Incomplete,
    Errored(Vec<SyntaxError>),
    Succeeded(Value),
}

pub struct Console {
    ctx: InterpreterContext,
    registry: CommandRegistry,
    loader: Box<dyn SourceLoader>,
    buffer: String,
    sources: SourceMap,
    warnings: Vec<SyntaxError>,
}

impl Console {
    pub fn new(registry: CommandRegistry, loader: Box<dyn SourceLoader>) -> Self {
        Self {
            ctx: InterpreterContext::new(),
            registry,
            loader,
            buffer: String::new(),
            sources: SourceMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn submit(&mut self, line: &str) -> ConsoleOutcome {
        self.buffer.push_str(line);
        self.buffer.push('\n');

        let parsed = parse_module(
            CONSOLE_MODULE,
            Arc::from(self.buffer.as_str()),
            &mut ParserContext::new(),
        );
        if parsed.value().is_some_and(|module| !module.is_complete()) {
            debug!(pending = self.buffer.len(), "awaiting more input");
            return ConsoleOutcome::Incomplete;
        }

        let source = std::mem::take(&mut self.buffer);
        let compiled = compile_project_from_buffer_with(CONSOLE_MODULE, &source, &*self.loader);
        let (tree, errors, warnings) = compiled.into_parts();
        self.warnings = warnings;
        let Some(tree) = tree else {
            return ConsoleOutcome::Errored(errors);
        };
        self.sources = SourceMap::from_tree(&tree);
        if !errors.is_empty() {
            return ConsoleOutcome::Errored(errors);
        }

        let result = interpret_in(&tree, &mut self.ctx, &self.registry);
        if result.is_error() {
            return ConsoleOutcome::Errored(result.errors().to_vec());
        }
        ConsoleOutcome::Succeeded(result.expression_value().cloned().unwrap_or_default())
    }

    /// True while a partial statement is buffered.
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Drops any partial statement. Bindings are kept.
    pub fn discard_pending(&mut self) {
        self.buffer.clear();
    }

    /// Drops bindings, evaluated modules and any partial statement.
    pub fn reset(&mut self) {
        self.ctx = InterpreterContext::new();
        self.buffer.clear();
        self.sources = SourceMap::new();
        self.warnings.clear();
    }

    /// Warnings from the most recent compiled submission.
    pub fn warnings(&self) -> &[SyntaxError] {
        &self.warnings
    }

    /// Sources of the most recent compiled submission, for rendering its
    /// diagnostics.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn context(&self) -> &InterpreterContext {
        &self.ctx
    }
}
