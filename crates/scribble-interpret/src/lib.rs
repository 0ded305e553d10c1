//! Evaluation of resolved Scribble projects.

pub mod context;
pub mod interpreter;

pub use context::{Binding, InterpreterContext};
pub use interpreter::Interpreter;

use scribble_core::command::CommandRegistry;
use scribble_core::diagnostics::ProcessResult;
use scribble_core::processor::process;
use scribble_core::Node;
use scribble_lang::{
    compile_project_from_buffer_with, compile_project_with, InMemoryLoader, SourceLoader,
};

/// Evaluates `tree` in a fresh context.
pub fn interpret(tree: &Node, registry: &CommandRegistry) -> ProcessResult {
    let mut ctx = InterpreterContext::new();
    interpret_in(tree, &mut ctx, registry)
}

/// Evaluates `tree` in `ctx`, keeping whatever bindings it already holds.
pub fn interpret_in(
    tree: &Node,
    ctx: &mut InterpreterContext,
    registry: &CommandRegistry,
) -> ProcessResult {
    let mut interpreter = Interpreter::new(registry);
    process(&mut interpreter, tree, ctx, ProcessResult::new())
}

/// Compiles `source` as the main module `name`, resolving imports through
/// `loader`, and evaluates it when compilation produced no errors.
pub fn evaluate_with(
    name: &str,
    source: &str,
    loader: &dyn SourceLoader,
    ctx: &mut InterpreterContext,
    registry: &CommandRegistry,
) -> ProcessResult {
    run_compiled(
        compile_project_from_buffer_with(name, source, loader),
        ctx,
        registry,
    )
}

/// Loads the main module `name` through `loader` and runs the project.
pub fn run_project(
    name: &str,
    loader: &dyn SourceLoader,
    ctx: &mut InterpreterContext,
    registry: &CommandRegistry,
) -> ProcessResult {
    run_compiled(compile_project_with(name, loader), ctx, registry)
}

/// Compilation warnings are carried into the returned result; compilation
/// errors stop evaluation.
fn run_compiled(
    compiled: ProcessResult,
    ctx: &mut InterpreterContext,
    registry: &CommandRegistry,
) -> ProcessResult {
    let (tree, errors, warnings) = compiled.into_parts();
    let tree = match tree {
        Some(tree) if errors.is_empty() => tree,
        _ => {
            let mut failed = ProcessResult::failure(errors);
            warnings.into_iter().for_each(|warning| failed.warning(warning));
            return failed;
        }
    };
    let mut seeded = ProcessResult::new();
    warnings.into_iter().for_each(|warning| seeded.warning(warning));
    let mut interpreter = Interpreter::new(registry);
    process(&mut interpreter, &tree, ctx, seeded)
}

/// Compiles and runs a self-contained buffer in a fresh context.
pub fn evaluate(source: &str, registry: &CommandRegistry) -> ProcessResult {
    let mut ctx = InterpreterContext::new();
    evaluate_with("main", source, &InMemoryLoader::new(), &mut ctx, registry)
}
