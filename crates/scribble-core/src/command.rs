//! Bridge between scripts and commands registered by the host application.
//!
//! The boundary is string typed: every argument crosses as the
//! `to_string()` rendering of its [`Value`].

use crate::error::{ErrorCode, Fault};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("command '{0}' failed: {1}")]
    Failed(String, String),
    #[error("invalid argument '{0}': {1}")]
    InvalidArgument(String, String),
}

pub type CommandResult = Result<Option<String>, CommandError>;

pub type CommandCallback = Arc<dyn Fn(&[String]) -> CommandResult + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParameter {
    pub name: String,
    pub synopsis: String,
}

/// A named host command with its native callback.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub synopsis: String,
    pub parameters: Vec<CommandParameter>,
    callback: CommandCallback,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        synopsis: impl Into<String>,
        callback: impl Fn(&[String]) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            synopsis: synopsis.into(),
            parameters: Vec::new(),
            callback: Arc::new(callback),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, synopsis: impl Into<String>) -> Self {
        self.parameters.push(CommandParameter {
            name: name.into(),
            synopsis: synopsis.into(),
        });
        self
    }

    pub fn invoke(&self, args: &[String]) -> CommandResult {
        (self.callback)(args)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("synopsis", &self.synopsis)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// The table of commands the host exposes to scripts. Built once and handed
/// to the interpreter by reference.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command`, returning the one it replaced.
    pub fn register(&mut self, command: Command) -> Option<Arc<Command>> {
        self.commands
            .insert(command.name.clone(), Arc::new(command))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn adapter(&self, name: &str) -> Option<CommandAdapter> {
        self.get(name).cloned().map(CommandAdapter::new)
    }
}

/// Makes a [`Command`] callable like a script function.
#[derive(Debug, Clone)]
pub struct CommandAdapter {
    command: Arc<Command>,
}

impl CommandAdapter {
    pub fn new(command: Arc<Command>) -> Self {
        Self { command }
    }

    pub fn name(&self) -> &str {
        &self.command.name
    }

    pub fn parameters(&self) -> &[CommandParameter] {
        &self.command.parameters
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Fault> {
        if args.len() != self.command.parameters.len() {
            return Err(Fault::new(
                ErrorCode::ArgumentCountMismatch,
                format!(
                    "command '{}' expects {} argument(s), got {}",
                    self.command.name,
                    self.command.parameters.len(),
                    args.len()
                ),
            ));
        }
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        tracing::debug!(command = %self.command.name, ?args, "invoking host command");
        match self.command.invoke(&args) {
            Ok(Some(output)) => Ok(Value::Text(output)),
            Ok(None) => Ok(Value::Null),
            Err(err) => Err(Fault::new(ErrorCode::ExecutionError, err.to_string())),
        }
    }
}
