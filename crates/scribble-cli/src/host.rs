//! Commands the `scribble` binary exposes to scripts.

use scribble_core::command::{Command, CommandError, CommandRegistry};

fn first<'a>(args: &'a [String], parameter: &str) -> Result<&'a String, CommandError> {
    args.first().ok_or_else(|| {
        CommandError::InvalidArgument(parameter.to_string(), "missing argument".to_string())
    })
}

pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(
        Command::new("print", "write a line to standard output", |args| {
            println!("{}", first(args, "text")?);
            Ok(None)
        })
        .with_parameter("text", "line to write"),
    );
    registry.register(
        Command::new("getenv", "read an environment variable", |args| {
            let name = first(args, "name")?;
            std::env::var(name)
                .map(Some)
                .map_err(|err| CommandError::InvalidArgument(name.clone(), err.to_string()))
        })
        .with_parameter("name", "variable name"),
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_lists_host_commands() {
        let registry = default_registry();
        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["getenv", "print"]);
    }

    #[test]
    fn missing_variable_is_an_invalid_argument() {
        let registry = default_registry();
        let getenv = registry.get("getenv").unwrap();
        let outcome = getenv.invoke(&["SCRIBBLE_SURELY_UNSET_VARIABLE".to_string()]);
        assert!(matches!(outcome, Err(CommandError::InvalidArgument(..))));
    }

    #[test]
    fn invoking_without_arguments_is_an_invalid_argument() {
        let registry = default_registry();
        for name in ["print", "getenv"] {
            let outcome = registry.get(name).unwrap().invoke(&[]);
            assert!(
                matches!(outcome, Err(CommandError::InvalidArgument(..))),
                "{name}: {outcome:?}"
            );
        }
    }
}
