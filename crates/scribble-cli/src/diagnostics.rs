//! Diagnostic and error reporting utilities

use crate::Result;
use miette::{Diagnostic, NamedSource, SourceSpan};
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::span::{FileId, Span};
use scribble_core::Node;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Set up enhanced error reporting with miette
pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .map_err(|e| crate::CliError::Config(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

#[derive(Error, Debug, Diagnostic)]
pub enum ScribbleDiagnostic {
    #[error("{code}: {message}")]
    #[diagnostic(code(scribble::error))]
    Error {
        code: ErrorCode,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        err_span: Option<SourceSpan>,
        #[help]
        help: Option<String>,
    },

    #[error("{code}: {message}")]
    #[diagnostic(code(scribble::warning), severity(Warning))]
    Warning {
        code: ErrorCode,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        err_span: Option<SourceSpan>,
    },
}

/// Module sources of one compiled project, keyed by the file id their spans
/// carry.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    files: HashMap<FileId, (String, Arc<str>)>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every module of a `Project` tree, or the single module when
    /// given one directly.
    pub fn from_tree(tree: &Node) -> Self {
        let mut map = Self::new();
        map.add_tree(tree);
        map
    }

    pub fn add_tree(&mut self, tree: &Node) {
        if let Some(project) = tree.as_project() {
            for module in &project.modules {
                self.add_tree(module);
            }
        } else if let Some(module) = tree.as_module() {
            self.files.insert(
                tree.location.file,
                (module.name.clone(), Arc::clone(&module.buffer)),
            );
        }
    }

    pub fn source(&self, file: FileId) -> Option<(&str, &str)> {
        self.files
            .get(&file)
            .map(|(name, buffer)| (name.as_str(), buffer.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Source snippet and label span for `location`. Spans with no line
    /// were never attached to a buffer; they get an empty source and no label.
    fn locate(&self, location: &Span) -> (NamedSource<String>, Option<SourceSpan>) {
        let found = self
            .source(location.file)
            .filter(|(_, buffer)| location.line > 0 && (location.hi as usize) <= buffer.len());
        match found {
            Some((name, buffer)) => (
                NamedSource::new(name, buffer.to_string()),
                Some((location.lo as usize, location.len()).into()),
            ),
            None => (NamedSource::new("<unknown>", String::new()), None),
        }
    }

    pub fn error(&self, error: &SyntaxError) -> ScribbleDiagnostic {
        let (src, err_span) = self.locate(&error.location);
        ScribbleDiagnostic::Error {
            code: error.code,
            message: error.message.clone(),
            src,
            err_span,
            help: help_for(error.code).map(str::to_string),
        }
    }

    pub fn warning(&self, warning: &SyntaxError) -> ScribbleDiagnostic {
        let (src, err_span) = self.locate(&warning.location);
        ScribbleDiagnostic::Warning {
            code: warning.code,
            message: warning.message.clone(),
            src,
            err_span,
        }
    }
}

fn help_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::ModuleNotFound => Some("check the resolver search paths in scribble.toml"),
        ErrorCode::UndeclaredVariable => {
            Some("declare it with `var` or `const`, or import the module that defines it")
        }
        ErrorCode::UnknownIntrinsic => {
            Some("known intrinsics: len str int float bool typeof abs min max")
        }
        ErrorCode::MisplacedControlFlow => {
            Some("`break` needs an enclosing loop or switch, `continue` an enclosing loop")
        }
        ErrorCode::DivisionByZero => Some("guard the divisor before dividing"),
        _ => None,
    }
}

/// Pretty print diagnostics with context
pub fn print_diagnostic(diagnostic: ScribbleDiagnostic) {
    eprintln!("{:?}", miette::Report::new(diagnostic));
}

/// Prints every error and, when `show_warnings` is set, every warning.
/// Returns the number of errors printed.
pub fn report(
    sources: &SourceMap,
    errors: &[SyntaxError],
    warnings: &[SyntaxError],
    show_warnings: bool,
) -> usize {
    if show_warnings {
        for warning in warnings {
            print_diagnostic(sources.warning(warning));
        }
    }
    for error in errors {
        print_diagnostic(sources.error(error));
    }
    errors.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scribble_lang::{compile_project_from_buffer_with, InMemoryLoader};

    #[test]
    fn source_map_covers_every_module() {
        let loader = InMemoryLoader::new().with("lib", "var x = 1;");
        let compiled = compile_project_from_buffer_with("main", "import lib;", &loader);
        let map = SourceMap::from_tree(compiled.value().unwrap());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn errors_are_labelled_in_their_module() {
        let loader = InMemoryLoader::new();
        let compiled = compile_project_from_buffer_with("main", "var a = ;", &loader);
        let map = SourceMap::from_tree(compiled.value().unwrap());
        let error = &compiled.errors()[0];

        match map.error(error) {
            ScribbleDiagnostic::Error { src, err_span, .. } => {
                assert_eq!(src.name(), "main");
                let span = err_span.unwrap();
                assert_eq!(span.offset(), error.location.lo as usize);
            }
            other => panic!("expected an error diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn unlocated_errors_carry_no_source() {
        let error = SyntaxError::from_code(Span::default(), ErrorCode::ModuleNotFound);
        match SourceMap::new().error(&error) {
            ScribbleDiagnostic::Error { src, err_span, help, .. } => {
                assert_eq!(src.name(), "<unknown>");
                assert!(err_span.is_none());
                assert!(help.is_some());
            }
            other => panic!("expected an error diagnostic, got {other:?}"),
        }
    }
}
