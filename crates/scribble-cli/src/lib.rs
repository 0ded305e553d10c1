//! Command-line front end for the Scribble scripting language: file runner,
//! one-shot evaluator, tree dump and an interactive console.

pub mod commands;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod host;

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        /// Diagnostics were already rendered; only the count remains.
        #[error("{count} error(s) reported")]
        Script { count: usize },

        #[error(transparent)]
        Generic(#[from] eyre::Report),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
