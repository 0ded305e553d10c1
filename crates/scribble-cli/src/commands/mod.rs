//! Command implementations for the Scribble CLI

pub mod eval;
pub mod parse;
pub mod repl;
pub mod run;

pub use eval::eval_command;
pub use parse::parse_command;
pub use repl::repl_command;
pub use run::run_command;

use crate::config::CliConfig;
use crate::diagnostics::{report, SourceMap};
use crate::host::default_registry;
use crate::{CliError, Result};
use console::style;
use eyre::WrapErr;
use scribble_core::value::Value;
use scribble_interpret::{interpret_in, InterpreterContext};
use scribble_lang::{compile_project_from_buffer_with, SourceLoader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compiles `source` as module `name` and runs it with the host commands.
/// Diagnostics are printed here; the error carries only their count.
pub(crate) fn execute(
    name: &str,
    source: &str,
    loader: &dyn SourceLoader,
    config: &CliConfig,
) -> Result<Value> {
    let show_warnings = config.console.show_warnings;
    let (tree, errors, warnings) =
        compile_project_from_buffer_with(name, source, loader).into_parts();
    let sources = tree.as_ref().map(SourceMap::from_tree).unwrap_or_default();
    let tree = match tree {
        Some(tree) if errors.is_empty() => tree,
        _ => {
            let count = report(&sources, &errors, &warnings, show_warnings);
            return Err(CliError::Script { count });
        }
    };
    report(&sources, &[], &warnings, show_warnings);
    debug!(modules = sources.len(), "compiled project");

    let registry = default_registry();
    let mut ctx = InterpreterContext::new();
    let result = interpret_in(&tree, &mut ctx, &registry);
    if result.is_error() {
        let count = report(&sources, result.errors(), &[], false);
        return Err(CliError::Script { count });
    }
    Ok(result.expression_value().cloned().unwrap_or_default())
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Ok(source)
}

/// Module name for a script file: its stem, without directories.
pub(crate) fn module_name_of(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput(format!("not a script file: {}", path.display())))
}

/// Directory of `path`, usable as a search path.
pub(crate) fn directory_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(crate) fn print_value(value: &Value) {
    let rendered = match value {
        Value::Text(text) => format!("{:?}", text),
        other => other.to_string(),
    };
    if matches!(value, Value::Null) {
        println!("{} {}", style("Result:").green().bold(), style(rendered).dim());
    } else {
        println!("{} {}", style("Result:").green().bold(), style(rendered).cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn module_names_drop_directories_and_extension() {
        let name = module_name_of(Path::new("scripts/tools/build.scribble")).unwrap();
        assert_eq!(name, "build");
    }

    #[test]
    fn bare_file_names_search_the_working_directory() {
        assert_eq!(directory_of(Path::new("main.scribble")), PathBuf::from("."));
        assert_eq!(directory_of(Path::new("lib/a.scribble")), PathBuf::from("lib"));
    }

    #[test]
    fn execute_reports_runtime_failures_as_script_errors() {
        let loader = scribble_lang::InMemoryLoader::new();
        let err = execute("main", "1 / 0;", &loader, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Script { count: 1 }));
    }

    #[test]
    fn execute_returns_the_main_module_value() {
        let loader = scribble_lang::InMemoryLoader::new().with("lib", "var base = 40;");
        let value = execute("main", "import lib; base + 2;", &loader, &CliConfig::default())
            .unwrap();
        assert_eq!(value, Value::int(42));
    }
}
