use crate::ast::Node;
use crate::error::SyntaxError;
use crate::value::Value;

/// Outcome of a pass over a tree: the rewritten (or evaluated) tree plus the
/// diagnostics gathered on the way. Errors accumulate instead of aborting,
/// so one run reports as many problems as it can find.
#[derive(Debug, Clone, Default)]
pub struct ProcessResult {
    value: Option<Node>,
    errors: Vec<SyntaxError>,
    warnings: Vec<SyntaxError>,
}

impl ProcessResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(value: Node) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn failure(errors: Vec<SyntaxError>) -> Self {
        Self {
            value: None,
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn value(&self) -> Option<&Node> {
        self.value.as_ref()
    }

    pub fn take_value(&mut self) -> Option<Node> {
        self.value.take()
    }

    pub fn set_value(&mut self, value: Option<Node>) {
        self.value = value;
    }

    /// The value carried by an interpreter result, if there is one.
    pub fn expression_value(&self) -> Option<&Value> {
        self.value
            .as_ref()
            .and_then(|node| node.as_expression_result())
            .map(|result| &result.value)
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[SyntaxError] {
        &self.warnings
    }

    pub fn error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn warning(&mut self, warning: SyntaxError) {
        self.warnings.push(warning);
    }

    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = SyntaxError>) {
        self.errors.extend(errors);
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Appends the diagnostics of `other`; its value replaces ours when set.
    pub fn merge(&mut self, other: ProcessResult) {
        if other.value.is_some() {
            self.value = other.value;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn into_parts(self) -> (Option<Node>, Vec<SyntaxError>, Vec<SyntaxError>) {
        (self.value, self.errors, self.warnings)
    }

    pub fn into_result(self) -> Result<Node, Vec<SyntaxError>> {
        match self.value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, SyntaxNode};
    use crate::error::ErrorCode;
    use crate::span::Span;

    #[test]
    fn merge_accumulates_diagnostics() {
        let node = SyntaxNode::node(Span::default(), NodeKind::Pass);
        let mut first = ProcessResult::success(node.clone());
        first.error(SyntaxError::from_code(Span::default(), ErrorCode::UnexpectedToken));

        let mut second = ProcessResult::new();
        second.error(SyntaxError::from_code(Span::default(), ErrorCode::ModuleNotFound));
        second.warning(SyntaxError::from_code(Span::default(), ErrorCode::ModuleNotFound));

        first.merge(second);
        assert!(first.is_error());
        assert_eq!(first.errors().len(), 2);
        assert_eq!(first.warnings().len(), 1);
        assert!(first.has_value());
        assert!(first.into_result().is_err());
    }
}
