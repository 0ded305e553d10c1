use pretty_assertions::assert_eq;
use scribble_cli::console::{Console, ConsoleOutcome};
use scribble_core::command::CommandRegistry;
use scribble_core::error::ErrorCode;
use scribble_core::value::Value;
use scribble_lang::InMemoryLoader;

fn console() -> Console {
    Console::new(CommandRegistry::new(), Box::new(InMemoryLoader::new()))
}

fn codes(outcome: &ConsoleOutcome) -> Vec<ErrorCode> {
    match outcome {
        ConsoleOutcome::Errored(errors) => errors.iter().map(|e| e.code).collect(),
        other => panic!("expected errors, got {other:?}"),
    }
}

#[test]
fn completed_statement_succeeds_with_its_value() {
    let mut console = console();
    assert_eq!(console.submit("1 + 2;"), ConsoleOutcome::Succeeded(Value::int(3)));
    assert!(!console.is_pending());
}

#[test]
fn open_block_waits_for_more_input() {
    let mut console = console();
    assert_eq!(console.submit("var total = 0;"), ConsoleOutcome::Succeeded(Value::int(0)));
    assert_eq!(console.submit("while (total < 3) {"), ConsoleOutcome::Incomplete);
    assert!(console.is_pending());
    assert_eq!(console.submit("  total += 1;"), ConsoleOutcome::Incomplete);
    assert!(matches!(console.submit("}"), ConsoleOutcome::Succeeded(_)));
    assert!(!console.is_pending());
    assert_eq!(console.submit("total;"), ConsoleOutcome::Succeeded(Value::int(3)));
}

#[test]
fn dangling_operator_is_incomplete_until_finished() {
    let mut console = console();
    assert_eq!(console.submit("40 +"), ConsoleOutcome::Incomplete);
    assert_eq!(console.submit("2;"), ConsoleOutcome::Succeeded(Value::int(42)));
}

#[test]
fn syntax_errors_are_reported_and_discard_the_input() {
    let mut console = console();
    let outcome = console.submit("var a = ;");
    assert_eq!(codes(&outcome), vec![ErrorCode::UnexpectedToken]);
    assert!(!console.is_pending());
    assert!(!console.sources().is_empty());
}

#[test]
fn runtime_errors_keep_earlier_bindings() {
    let mut console = console();
    console.submit("var kept = 7;");
    let outcome = console.submit("kept / 0;");
    assert_eq!(codes(&outcome), vec![ErrorCode::DivisionByZero]);
    assert_eq!(console.submit("kept;"), ConsoleOutcome::Succeeded(Value::int(7)));
}

#[test]
fn functions_persist_across_submissions() {
    let mut console = console();
    console.submit("func double(x) {");
    console.submit("  return x * 2;");
    console.submit("}");
    assert_eq!(console.submit("double(21);"), ConsoleOutcome::Succeeded(Value::int(42)));
}

#[test]
fn reset_forgets_bindings() {
    let mut console = console();
    console.submit("var gone = 1;");
    console.reset();
    assert_eq!(codes(&console.submit("gone;")), vec![ErrorCode::UndeclaredVariable]);
}

#[test]
fn imports_resolve_through_the_loader() {
    let loader = InMemoryLoader::new().with("greeting", "const hello = \"hi\";");
    let mut console = Console::new(CommandRegistry::new(), Box::new(loader));
    assert_eq!(
        console.submit("import greeting; hello + \"!\";"),
        ConsoleOutcome::Succeeded(Value::text("hi!"))
    );
    assert_eq!(
        console.submit("greeting.hello;"),
        ConsoleOutcome::Succeeded(Value::text("hi"))
    );
}
