//! Run command implementation.

use super::{directory_of, execute, module_name_of, print_value, read_source};
use crate::{config::CliConfig, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the run command
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Scribble file to run
    pub file: PathBuf,

    /// Extra directories searched for imports, before the configured ones
    #[arg(short = 'I', long = "include")]
    pub include: Vec<PathBuf>,

    /// Print the value of the main module when it finishes
    #[arg(long)]
    pub print_result: bool,
}

pub fn run_command(args: RunArgs, config: &CliConfig) -> Result<()> {
    info!("Running file '{}'", args.file.display());

    let source = read_source(&args.file)?;
    let name = module_name_of(&args.file)?;
    let mut search = vec![directory_of(&args.file)];
    search.extend(args.include);
    let loader = config.loader(&search);

    let value = execute(&name, &source, &loader, config)?;
    if args.print_result {
        print_value(&value);
    }
    Ok(())
}
