//! Expression evaluation command implementation

use super::{execute, print_value, read_source};
use crate::{config::CliConfig, CliError, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the eval command
#[derive(Debug, Clone, Args)]
pub struct EvalArgs {
    /// Source text to evaluate
    #[arg(short, long, conflicts_with = "file")]
    pub expr: Option<String>,

    /// File whose contents are evaluated as the main module
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Skip printing the resulting value
    #[arg(long)]
    pub no_print: bool,
}

pub fn eval_command(args: EvalArgs, config: &CliConfig) -> Result<()> {
    let (source, description) = if let Some(expr) = args.expr {
        let description = format!("expression: {}", expr);
        (expr, description)
    } else if let Some(file) = &args.file {
        (read_source(file)?, format!("file '{}'", file.display()))
    } else {
        return Err(CliError::InvalidInput(
            "Either --expr or --file must be provided".to_string(),
        ));
    };

    info!("Evaluating {}", description);

    let loader = config.loader(&[]);
    let value = execute("main", &source, &loader, config)?;
    if !args.no_print {
        print_value(&value);
    }
    Ok(())
}
