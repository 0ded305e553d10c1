//! REPL (Read-Eval-Print Loop) command implementation

use super::read_source;
use crate::config::CliConfig;
use crate::console::{Console, ConsoleOutcome};
use crate::diagnostics::report;
use crate::host::default_registry;
use crate::Result;
use clap::Args;
use console::style;
use scribble_core::value::Value;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Arguments for the repl command
#[derive(Debug, Clone, Args)]
pub struct ReplArgs {
    /// Script evaluated before the first prompt
    #[arg(short, long)]
    pub load: Option<PathBuf>,

    /// Extra directories searched for imports, before the configured ones
    #[arg(short = 'I', long = "include")]
    pub include: Vec<PathBuf>,
}

pub fn repl_command(args: ReplArgs, config: &CliConfig) -> Result<()> {
    let loader = config.loader(&args.include);
    let mut console = Console::new(default_registry(), Box::new(loader));

    if let Some(path) = &args.load {
        let source = read_source(path)?;
        let outcome = console.submit(&source);
        if matches!(outcome, ConsoleOutcome::Incomplete) {
            console.discard_pending();
        }
        show(&console, outcome, config);
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let prompt = if console.is_pending() {
            &config.console.continuation_prompt
        } else {
            &config.console.prompt
        };
        print!("{}", style(prompt).dim());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":reset" => {
                console.reset();
                println!("{}", style("context cleared").dim());
                continue;
            }
            ":cancel" => {
                console.discard_pending();
                continue;
            }
            _ => {}
        }

        let outcome = console.submit(&line);
        show(&console, outcome, config);
    }
    Ok(())
}

fn show(console: &Console, outcome: ConsoleOutcome, config: &CliConfig) {
    let show_warnings = config.console.show_warnings;
    match outcome {
        ConsoleOutcome::Incomplete => {}
        ConsoleOutcome::Errored(errors) => {
            report(console.sources(), &errors, console.warnings(), show_warnings);
        }
        ConsoleOutcome::Succeeded(value) => {
            report(console.sources(), &[], console.warnings(), show_warnings);
            if !matches!(value, Value::Null) {
                println!("{}", style(value).cyan());
            }
        }
    }
}
