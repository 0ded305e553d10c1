use pretty_assertions::assert_eq;
use scribble_core::command::{Command, CommandError, CommandRegistry};
use scribble_core::error::ErrorCode;
use scribble_core::value::Value;
use scribble_core::ProcessResult;
use scribble_interpret::evaluate;
use std::sync::{Arc, Mutex};

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(
        Command::new("upper", "uppercase text", |args| Ok(Some(args[0].to_uppercase())))
            .with_parameter("text", "text to convert"),
    );
    registry.register(
        Command::new("join", "concatenate two values", |args| {
            Ok(Some(format!("{}{}", args[0], args[1])))
        })
        .with_parameter("left", "first value")
        .with_parameter("right", "second value"),
    );
    registry.register(Command::new("answer", "the answer", |_| Ok(Some("42".into()))));
    registry.register(Command::new("nothing", "returns no output", |_| Ok(None)));
    registry.register(Command::new("explode", "always fails", |_| {
        Err(CommandError::Failed("explode".into(), "boom".into()))
    }));
    registry
}

fn run(source: &str) -> ProcessResult {
    evaluate(source, &registry())
}

fn value(source: &str) -> Value {
    let result = run(source);
    assert!(!result.is_error(), "`{source}` failed: {:?}", result.errors());
    result.expression_value().cloned().unwrap_or_default()
}

#[test]
fn unbound_names_fall_back_to_host_commands() {
    assert_eq!(value("upper(\"abc\");"), Value::text("ABC"));
}

#[test]
fn arguments_cross_as_text() {
    assert_eq!(value("join(1, 2.5);"), Value::text("12.5"));
    assert_eq!(value("join(true, 'x');"), Value::text("truex"));
}

#[test]
fn command_output_converts_back_into_values() {
    assert_eq!(
        value("func int(v) intrinsic; int(answer()) + 1;"),
        Value::int(43)
    );
    assert_eq!(value("nothing();"), Value::Null);
}

#[test]
fn declarations_bind_commands_under_new_names() {
    assert_eq!(value("func shout(s) -> \"upper\"; shout(\"hi\");"), Value::text("HI"));
}

#[test]
fn declarations_check_the_command() {
    assert_eq!(
        run("func f(s) -> \"missing\";").errors()[0].code,
        ErrorCode::UndeclaredCommand
    );
    assert_eq!(
        run("func f(a, b) -> \"upper\";").errors()[0].code,
        ErrorCode::ArgumentCountMismatch
    );
}

#[test]
fn command_failures_become_execution_errors() {
    let result = run("var x = 1;\nexplode();");
    let error = &result.errors()[0];
    assert_eq!(error.code, ErrorCode::ExecutionError);
    assert_eq!(error.location.line, 2);
    assert!(error.message.contains("boom"), "{}", error.message);
}

#[test]
fn command_arity_is_checked_at_the_call() {
    assert_eq!(
        run("upper(\"a\", \"b\");").errors()[0].code,
        ErrorCode::ArgumentCountMismatch
    );
}

#[test]
fn script_bindings_shadow_commands() {
    assert_eq!(value("func upper(s) s + \"!\"; upper(\"a\");"), Value::text("a!"));
}

#[test]
fn commands_run_in_call_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let mut registry = CommandRegistry::new();
    registry.register(
        Command::new("record", "remember an argument", move |args| {
            sink.lock().unwrap().push(args[0].clone());
            Ok(None)
        })
        .with_parameter("entry", "value to record"),
    );

    let result = evaluate(
        "for (var i = 0; i < 3; i += 1) record(i * 2);",
        &registry,
    );
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(*calls.lock().unwrap(), vec!["0", "2", "4"]);
}
