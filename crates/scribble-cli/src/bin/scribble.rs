//! Scribble CLI Binary
//!
//! # Usage
//!
//! ```bash
//! # Run a script; imports resolve next to it and on the configured paths
//! scribble run main.scribble -I lib
//!
//! # Evaluate source text
//! scribble eval --expr "1 + 2 * 3"
//!
//! # Print the parsed tree of a script and its imports
//! scribble parse main.scribble --resolve-imports
//!
//! # Start an interactive console
//! scribble repl
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use scribble_cli::{
    commands::{self, eval::EvalArgs, parse::ParseArgs, repl::ReplArgs, run::RunArgs},
    config::CliConfig,
    diagnostics::setup_error_reporting,
    CliError, Result,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "scribble",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scribble: a small embeddable scripting language",
    long_about = r#"
Scribble is a dynamically typed scripting language with modules, functions
and a string-typed bridge to commands supplied by the host.

EXAMPLES:
    scribble run hello.scribble          # Run a Scribble file
    scribble eval --expr "1 + 2 * 3"     # Evaluate source text
    scribble parse hello.scribble        # Print the parsed tree
    scribble repl                        # Interactive console
    "#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Scribble file
    Run(RunArgs),
    /// Evaluate source text or a file
    Eval(EvalArgs),
    /// Parse and print Scribble code
    Parse(ParseArgs),
    /// Start an interactive console
    Repl(ReplArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_error_reporting()?;
    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format)?;

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(CliError::Io)?;
    }

    let config = CliConfig::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Run(args) => commands::run_command(args, &config),
        Commands::Eval(args) => commands::eval_command(args, &config),
        Commands::Parse(args) => commands::parse_command(args, &config),
        Commands::Repl(args) => commands::repl_command(args, &config),
    };

    match result {
        Ok(()) => {
            if cli.verbose > 0 {
                info!("Command completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            if cli.verbose > 0 {
                error!(?e, "detailed error context");
            }
            std::process::exit(1);
        }
    }
}

fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_level: Option<LogLevel>,
    log_format: LogFormat,
) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Script output owns stdout.
    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
