//! Import resolution: turns a `Project` holding only its main buffer into
//! the closed set of modules reachable through `import` statements.

use crate::context::ParserContext;
use crate::loader::{sanitize_module_name, FileSystemLoader, SourceLoader};
use crate::parser::parse_module;
use scribble_core::ast::{Node, NodeKind, Project, SyntaxNode};
use scribble_core::diagnostics::ProcessResult;
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::processor::{process, Processor, Step};
use scribble_core::span::Span;
use std::sync::Arc;

pub struct Resolver<'l> {
    loader: &'l dyn SourceLoader,
}

impl<'l> Resolver<'l> {
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self { loader }
    }

    /// Parses the main module when missing, then drains pending imports
    /// until no new module shows up. A name already in the project is
    /// skipped, so import cycles terminate with every module present once.
    fn resolve_project(
        &mut self,
        node: &Node,
        project: &Project,
        ctx: &mut ParserContext,
        result: &mut ProcessResult,
    ) -> Step {
        let mut modules = project.modules.clone();
        let mut changed = false;

        if !project.contains_module(&project.main_module) {
            let parsed = parse_module(&project.main_module, project.main_buffer.clone(), ctx);
            modules.extend(absorb(parsed, result));
            changed = true;
        }

        while ctx.has_pending() {
            for (name, location) in ctx.take_pending() {
                if modules.iter().any(|m| module_name(m) == Some(name.as_str())) {
                    tracing::trace!(module = %name, "already resolved");
                    continue;
                }
                if !ctx.mark_attempted(&name) {
                    continue;
                }
                match self.loader.load(&name) {
                    Ok(source) => {
                        tracing::debug!(module = %name, "resolved import");
                        let parsed = parse_module(&name, Arc::from(source), ctx);
                        modules.extend(absorb(parsed, result));
                        changed = true;
                    }
                    Err(err) => {
                        result.error(SyntaxError::new(
                            location,
                            ErrorCode::ModuleNotFound,
                            err.to_string(),
                        ));
                    }
                }
            }
        }
        for warning in ctx.take_warnings() {
            result.warning(warning);
        }

        if !changed {
            return Ok(Arc::clone(node));
        }
        Ok(SyntaxNode::node(
            node.location,
            NodeKind::Project(Project {
                main_module: project.main_module.clone(),
                main_buffer: project.main_buffer.clone(),
                modules,
            }),
        ))
    }
}

impl Processor for Resolver<'_> {
    type Context = ParserContext;

    fn name(&self) -> &str {
        "resolve"
    }

    fn handle(
        &mut self,
        node: &Node,
        ctx: &mut ParserContext,
        result: &mut ProcessResult,
    ) -> Option<Step> {
        match &node.kind {
            NodeKind::Project(project) => Some(self.resolve_project(node, project, ctx, result)),
            _ => None,
        }
    }
}

/// Moves the diagnostics of a module parse into `result` and returns the module.
fn absorb(mut parsed: ProcessResult, result: &mut ProcessResult) -> Option<Node> {
    let module = parsed.take_value();
    result.merge(parsed);
    module
}

fn module_name(node: &Node) -> Option<&str> {
    node.as_module().map(|module| module.name.as_str())
}

/// Loads `name` from disk relative to the working directory and resolves
/// its imports.
pub fn compile_project(name: &str) -> ProcessResult {
    compile_project_with(name, &FileSystemLoader::default())
}

pub fn compile_project_with(name: &str, loader: &dyn SourceLoader) -> ProcessResult {
    let module = sanitize_module_name(name);
    match loader.load(&module) {
        Ok(buffer) => compile_project_from_buffer_with(&module, &buffer, loader),
        Err(err) => ProcessResult::failure(vec![SyntaxError::new(
            Span::default(),
            ErrorCode::ModuleNotFound,
            err.to_string(),
        )]),
    }
}

/// Compiles `buffer` as the main module `name`; imports come from disk.
pub fn compile_project_from_buffer(name: &str, buffer: &str) -> ProcessResult {
    compile_project_from_buffer_with(name, buffer, &FileSystemLoader::default())
}

pub fn compile_project_from_buffer_with(
    name: &str,
    buffer: &str,
    loader: &dyn SourceLoader,
) -> ProcessResult {
    let project = SyntaxNode::node(
        Span::default(),
        NodeKind::Project(Project {
            main_module: sanitize_module_name(name),
            main_buffer: Arc::from(buffer),
            modules: Vec::new(),
        }),
    );
    let mut ctx = ParserContext::new();
    process(
        &mut Resolver::new(loader),
        &project,
        &mut ctx,
        ProcessResult::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryLoader;

    #[test]
    fn resolved_project_is_reused_when_nothing_is_pending() {
        let loader = InMemoryLoader::new();
        let first = compile_project_from_buffer_with("main", "1;", &loader);
        let project = first.value().unwrap().clone();

        let mut ctx = ParserContext::new();
        let again = process(
            &mut Resolver::new(&loader),
            &project,
            &mut ctx,
            ProcessResult::new(),
        );
        assert!(Arc::ptr_eq(again.value().unwrap(), &project));
    }
}
