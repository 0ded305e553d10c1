use pretty_assertions::assert_eq;
use scribble_core::command::CommandRegistry;
use scribble_core::error::ErrorCode;
use scribble_core::value::Value;
use scribble_interpret::{evaluate, evaluate_with, run_project, InterpreterContext};
use scribble_lang::InMemoryLoader;

fn run(loader: &InMemoryLoader, main: &str) -> scribble_core::ProcessResult {
    let mut ctx = InterpreterContext::new();
    evaluate_with("main", main, loader, &mut ctx, &CommandRegistry::new())
}

#[test]
fn qualified_access_by_path_or_last_segment() {
    let loader = InMemoryLoader::new().with("util/strings", "const hello = \"hi\";");
    let result = run(
        &loader,
        "import util/strings;\nutil.strings.hello + strings.hello;",
    );
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::text("hihi")));
}

#[test]
fn qualifier_must_name_a_module() {
    let loader = InMemoryLoader::new().with("util/strings", "const hello = \"hi\";");
    let result = run(&loader, "import util/strings;\nnothing.hello;");
    assert_eq!(result.errors()[0].code, ErrorCode::UndeclaredVariable);
    assert_eq!(result.errors()[0].location.line, 2);

    let result = run(&loader, "import util/strings;\nstrings.goodbye;");
    assert_eq!(result.errors()[0].code, ErrorCode::UndeclaredVariable);
}

#[test]
fn qualified_access_reads_the_shared_root_scope() {
    let loader = InMemoryLoader::new()
        .with("lib", "var from_lib = 1;")
        .with("other", "var from_other = 2;");
    let result = run(
        &loader,
        "import lib; import other; var from_main = 3;\nlib.from_lib + lib.from_other + lib.from_main;",
    );
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::int(6)));
}

#[test]
fn imports_run_before_their_importers() {
    let loader = InMemoryLoader::new()
        .with("a", "import b; var from_a = from_b + 1;")
        .with("b", "var from_b = 1;");
    let result = run(&loader, "import a; from_a * 10 + from_b;");
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::int(21)));
}

#[test]
fn shared_import_runs_before_both_importers() {
    let loader = InMemoryLoader::new()
        .with("a", "var x = 1;")
        .with("b", "import a; var y = x + 1;");
    let result = run(&loader, "import a; import b; y;");
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::int(2)));
}

#[test]
fn later_import_runs_first_when_an_earlier_one_needs_it() {
    let loader = InMemoryLoader::new()
        .with("a", "import b; var from_a = from_b * 2;")
        .with("b", "var from_b = 5;");
    let result = run(&loader, "import b; import a; from_a;");
    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::int(10)));
}

#[test]
fn cyclic_imports_run_each_module_once_and_warn() {
    let loader = InMemoryLoader::new()
        .with("a", "import b; var in_a = 1; in_a + in_b;")
        .with("b", "import a; var in_b = 2;");
    let mut ctx = InterpreterContext::new();
    let result = run_project("a", &loader, &mut ctx, &CommandRegistry::new());

    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(result.expression_value(), Some(&Value::int(3)));
    assert_eq!(result.warnings().len(), 1);
    assert_eq!(result.warnings()[0].code, ErrorCode::CyclicImport);
}

#[test]
fn modules_are_evaluated_once_per_context() {
    let loader = InMemoryLoader::new().with("counter", "var hits = 0; hits += 1;");
    let registry = CommandRegistry::new();
    let mut ctx = InterpreterContext::new();

    let first = evaluate_with("console", "import counter; hits;", &loader, &mut ctx, &registry);
    assert_eq!(first.expression_value(), Some(&Value::int(1)));

    let second = evaluate_with("console", "import counter; hits;", &loader, &mut ctx, &registry);
    assert!(!second.is_error(), "{:?}", second.errors());
    assert_eq!(second.expression_value(), Some(&Value::int(1)));
}

#[test]
fn main_module_state_persists_across_submissions() {
    let loader = InMemoryLoader::new();
    let registry = CommandRegistry::new();
    let mut ctx = InterpreterContext::new();

    evaluate_with("console", "var total = 40;", &loader, &mut ctx, &registry);
    let result = evaluate_with("console", "total + 2;", &loader, &mut ctx, &registry);
    assert_eq!(result.expression_value(), Some(&Value::int(42)));
    assert_eq!(ctx.globals().len(), 1);
}

#[test]
fn missing_module_stops_evaluation() {
    let result = run(&InMemoryLoader::new(), "var x = 1;\nimport absent;\nx;");
    assert!(!result.has_value());
    assert_eq!(result.errors()[0].code, ErrorCode::ModuleNotFound);
}

#[test]
fn syntax_errors_stop_evaluation() {
    let result = evaluate("var a = ;\nvar b = 2;", &CommandRegistry::new());
    assert!(!result.has_value());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].code, ErrorCode::UnexpectedToken);
}

#[test]
fn top_level_return_ends_the_module() {
    let result = evaluate("var x = 1; return x + 1; x = 100;", &CommandRegistry::new());
    assert_eq!(result.expression_value(), Some(&Value::int(2)));
}
