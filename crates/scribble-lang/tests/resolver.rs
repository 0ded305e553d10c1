use pretty_assertions::assert_eq;
use scribble_core::error::ErrorCode;
use scribble_lang::{
    compile_project_from_buffer_with, compile_project_with, FileSystemLoader, InMemoryLoader,
};
use std::fs;
use tempfile::TempDir;

fn module_names(result: &scribble_core::ProcessResult) -> Vec<String> {
    result
        .value()
        .and_then(|node| node.as_project())
        .map(|project| project.module_names())
        .unwrap_or_default()
}

#[test]
fn cyclic_imports_resolve_each_module_once() {
    let loader = InMemoryLoader::new()
        .with("a", "import b; var from_a = 1;")
        .with("b", "import a; var from_b = 2;");
    let result = compile_project_with("a", &loader);

    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(module_names(&result), vec!["a", "b"]);
    assert_eq!(result.warnings().len(), 1);
    assert_eq!(result.warnings()[0].code, ErrorCode::CyclicImport);
}

#[test]
fn transitive_imports_are_discovered() {
    let loader = InMemoryLoader::new()
        .with("lib/one", "import lib/two;")
        .with("lib/two", "import lib/three;")
        .with("lib/three", "var deepest = 3;");
    let result = compile_project_from_buffer_with("main", "import lib/one;", &loader);

    assert!(!result.is_error());
    assert_eq!(
        module_names(&result),
        vec!["main", "lib/one", "lib/two", "lib/three"]
    );
    assert!(result.warnings().is_empty());
}

#[test]
fn diamond_imports_are_not_cycles() {
    let loader = InMemoryLoader::new()
        .with("left", "import shared;")
        .with("right", "import shared;")
        .with("shared", "var s = 0;");
    let result =
        compile_project_from_buffer_with("main", "import left; import right;", &loader);

    assert_eq!(module_names(&result), vec!["main", "left", "right", "shared"]);
    assert!(result.warnings().is_empty());
}

#[test]
fn missing_module_is_reported_at_import() {
    let loader = InMemoryLoader::new();
    let result = compile_project_from_buffer_with("main", "var x = 1;\nimport nowhere;", &loader);

    assert_eq!(result.errors().len(), 1);
    let error = &result.errors()[0];
    assert_eq!(error.code, ErrorCode::ModuleNotFound);
    assert_eq!((error.location.line, error.location.column), (2, 1));
    assert_eq!(module_names(&result), vec!["main"]);
}

#[test]
fn syntax_errors_in_imported_modules_are_collected() {
    let loader = InMemoryLoader::new().with("broken", "var = ;");
    let result = compile_project_from_buffer_with("main", "import broken; 1 +;", &loader);

    let codes: Vec<_> = result.errors().iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::UnexpectedToken, ErrorCode::UnexpectedToken]
    );
    assert_eq!(module_names(&result), vec!["main", "broken"]);
}

#[test]
fn resolves_modules_from_disk() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("util")).unwrap();
    fs::write(
        dir.path().join("main.scribble"),
        "import util/strings;\nvar greeting = util.strings.hello;\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("util/strings.scribble"),
        "import main;\nconst hello = \"hi\";\n",
    )
    .unwrap();

    let loader = FileSystemLoader::new(vec![dir.path().to_path_buf()]);
    let result = compile_project_with("main.scribble", &loader);

    assert!(!result.is_error(), "{:?}", result.errors());
    assert_eq!(module_names(&result), vec!["main", "util/strings"]);
}

#[test]
fn missing_main_module_fails() {
    let dir = TempDir::new().unwrap();
    let loader = FileSystemLoader::new(vec![dir.path().to_path_buf()]);
    let result = compile_project_with("absent", &loader);

    assert!(result.is_error());
    assert!(!result.has_value());
    assert_eq!(result.errors()[0].code, ErrorCode::ModuleNotFound);
}
