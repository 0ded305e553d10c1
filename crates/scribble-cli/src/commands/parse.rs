//! Parse command: prints the syntax tree back as source.

use super::{directory_of, module_name_of, read_source};
use crate::diagnostics::{report, SourceMap};
use crate::{config::CliConfig, CliError, Result};
use clap::Args;
use scribble_lang::{compile_project_from_buffer_with, parse_expression, parse_module, ParserContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// Expression to parse
    #[arg(short, long, conflicts_with = "files")]
    pub expr: Option<String>,

    /// Files containing code to parse
    pub files: Vec<PathBuf>,

    /// Resolve and print imported modules as well
    #[arg(long)]
    pub resolve_imports: bool,
}

pub fn parse_command(args: ParseArgs, config: &CliConfig) -> Result<()> {
    if let Some(expr) = args.expr {
        return match parse_expression(&expr) {
            Ok(tree) => {
                println!("{}", tree);
                Ok(())
            }
            Err(errors) => {
                let count = report(&SourceMap::new(), &errors, &[], false);
                Err(CliError::Script { count })
            }
        };
    }

    if args.files.is_empty() {
        return Err(CliError::InvalidInput(
            "Must specify either --expr or at least one path".to_string(),
        ));
    }

    let mut failures = 0;
    for path in &args.files {
        failures += parse_path(path, args.resolve_imports, config)?;
    }
    if failures > 0 {
        return Err(CliError::Script { count: failures });
    }
    Ok(())
}

/// Prints the modules parsed from `path` and returns the number of errors.
fn parse_path(path: &Path, resolve_imports: bool, config: &CliConfig) -> Result<usize> {
    let source = read_source(path)?;
    let name = module_name_of(path)?;
    let parsed = if resolve_imports {
        let loader = config.loader(&[directory_of(path)]);
        compile_project_from_buffer_with(&name, &source, &loader)
    } else {
        parse_module(&name, Arc::from(source), &mut ParserContext::new())
    };

    let (tree, errors, warnings) = parsed.into_parts();
    let sources = tree.as_ref().map(SourceMap::from_tree).unwrap_or_default();
    if let Some(tree) = &tree {
        print!("{}", tree);
    }
    Ok(report(
        &sources,
        &errors,
        &warnings,
        config.console.show_warnings,
    ))
}
