//! Generic, context-threaded tree rewriting.
//!
//! A [`Processor`] gets the first look at every node. Nodes it does not
//! handle are rebuilt structurally: each child is processed in turn, the
//! first error stops the rebuild, and a node whose children all came back
//! unchanged is returned as the very same shared node.

use crate::ast::{Node, NodeType, SyntaxNode};
use crate::diagnostics::ProcessResult;
use crate::error::{ErrorCode, SyntaxError};
use std::sync::Arc;

pub type Step = Result<Node, SyntaxError>;

pub trait Processor {
    type Context;

    fn name(&self) -> &str;

    /// Handles `node` when this pass has a rule for its node type; `None`
    /// falls back to structural recursion.
    fn handle(
        &mut self,
        node: &Node,
        ctx: &mut Self::Context,
        result: &mut ProcessResult,
    ) -> Option<Step>;
}

/// Runs `processor` over `tree`, recording the outcome in `result`.
pub fn process<P: Processor>(
    processor: &mut P,
    tree: &Node,
    ctx: &mut P::Context,
    mut result: ProcessResult,
) -> ProcessResult {
    tracing::debug!(pass = processor.name(), root = %tree.node_type(), "processing tree");
    match process_node(processor, tree, ctx, &mut result) {
        Ok(node) => result.set_value(Some(node)),
        Err(err) => {
            tracing::debug!(pass = processor.name(), error = %err, "pass failed");
            result.error(err);
            result.set_value(None);
        }
    }
    result
}

pub fn process_node<P: Processor>(
    processor: &mut P,
    node: &Node,
    ctx: &mut P::Context,
    result: &mut ProcessResult,
) -> Step {
    tracing::trace!(pass = processor.name(), node = %node.node_type(), "visit");
    match processor.handle(node, ctx, result) {
        Some(step) => step,
        None => rebuild(processor, node, ctx, result),
    }
}

/// Structural fallback: reprocesses every child and splices the results
/// into a fresh node, or hands back `node` itself when nothing changed.
pub fn rebuild<P: Processor>(
    processor: &mut P,
    node: &Node,
    ctx: &mut P::Context,
    result: &mut ProcessResult,
) -> Step {
    let rebuilt = node
        .kind
        .map_children(&mut |child| process_node(processor, child, ctx, result))?;
    match rebuilt {
        Some(kind) => Ok(Arc::new(SyntaxNode::new(node.location, kind))),
        None => Ok(Arc::clone(node)),
    }
}

/// Processes `node` and checks that the outcome has the `expected` type.
/// Errors from the child propagate untouched; a type mismatch becomes a new
/// [`ErrorCode::UnexpectedNodeType`] diagnostic.
pub fn process_as<P: Processor>(
    processor: &mut P,
    node: &Node,
    ctx: &mut P::Context,
    result: &mut ProcessResult,
    expected: NodeType,
) -> Step {
    let processed = process_node(processor, node, ctx, result)?;
    expect_type(&processed, expected)?;
    Ok(processed)
}

pub fn expect_type(node: &Node, expected: NodeType) -> Result<(), SyntaxError> {
    if node.node_type() == expected {
        Ok(())
    } else {
        Err(SyntaxError::new(
            node.location,
            ErrorCode::UnexpectedNodeType,
            format!("expected {expected}, found {}", node.node_type()),
        ))
    }
}
