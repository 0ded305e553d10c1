use pretty_assertions::assert_eq;
use scribble_core::diagnostics::ProcessResult;
use scribble_core::error::ErrorCode;
use scribble_lang::{parse_module, ParserContext};
use std::sync::Arc;

fn parse(source: &str) -> ProcessResult {
    let mut ctx = ParserContext::new();
    parse_module("main", Arc::from(source), &mut ctx)
}

fn codes(result: &ProcessResult) -> Vec<ErrorCode> {
    result.errors().iter().map(|err| err.code).collect()
}

#[test]
fn malformed_parameter_list_points_at_offending_token() {
    let result = parse("func f(a, b c) { return a; }");
    assert_eq!(codes(&result), vec![ErrorCode::MalformedParameterList]);
    let location = result.errors()[0].location;
    assert_eq!((location.line, location.column), (1, 13));
}

#[test]
fn parameter_list_rejects_leading_comma() {
    let result = parse("func f(, a) ;");
    assert_eq!(codes(&result), vec![ErrorCode::MalformedParameterList]);
    assert_eq!(result.errors()[0].location.column, 8);
}

#[test]
fn duplicate_parameters_are_rejected() {
    let result = parse("func f(a, a) ;");
    assert_eq!(codes(&result), vec![ErrorCode::MalformedParameterList]);
    assert_eq!(result.errors()[0].location.column, 11);
}

#[test]
fn char_literal_must_hold_one_character() {
    assert_eq!(
        codes(&parse("var c = 'ab';")),
        vec![ErrorCode::MalformedCharLiteral]
    );
    assert_eq!(
        codes(&parse("var c = '';")),
        vec![ErrorCode::MalformedCharLiteral]
    );
    assert!(codes(&parse(r"var c = '\n';")).is_empty());
}

#[test]
fn dangling_operator_is_incomplete() {
    let partial = parse("1 +");
    assert!(!partial.value().unwrap().is_complete());
    assert_eq!(codes(&partial), vec![ErrorCode::UnexpectedEndOfInput]);

    let whole = parse("1 + 2");
    assert!(whole.value().unwrap().is_complete());
    assert!(!whole.is_error());
}

#[test]
fn open_block_is_incomplete() {
    let result = parse("while (x < 3) {\n  x = x + 1;\n");
    assert!(!result.value().unwrap().is_complete());
    assert_eq!(codes(&result), vec![ErrorCode::UnexpectedEndOfInput]);
}

#[test]
fn open_switch_is_incomplete() {
    let result = parse("switch x { case 1: y = 2;");
    assert!(!result.value().unwrap().is_complete());
}

#[test]
fn unterminated_string_is_incomplete() {
    let result = parse("var s = \"abc");
    assert!(!result.value().unwrap().is_complete());
    assert_eq!(codes(&result), vec![ErrorCode::UnterminatedLiteral]);
}

#[test]
fn errors_do_not_stop_following_statements() {
    let result = parse("var a = ;\nvar b = 2;\n1 + * 2;\nvar c = 3;");
    assert_eq!(
        codes(&result),
        vec![ErrorCode::UnexpectedToken, ErrorCode::UnexpectedToken]
    );
    assert_eq!(result.errors()[1].location.line, 3);
    let module = result.value().unwrap().as_module().unwrap().block.clone();
    assert_eq!(module.as_block().unwrap().statements.len(), 2);
}

#[test]
fn missing_semicolon_between_statements() {
    let result = parse("var a = 1 var b = 2;");
    assert_eq!(codes(&result), vec![ErrorCode::UnexpectedToken]);
    assert_eq!(result.errors()[0].location.column, 11);
}

#[test]
fn imports_are_recorded_not_loaded() {
    let mut ctx = ParserContext::new();
    let result = parse_module("main", Arc::from("import lib/util;"), &mut ctx);
    assert!(!result.is_error());
    let pending: Vec<String> = ctx.take_pending().into_iter().map(|(name, _)| name).collect();
    assert_eq!(pending, vec!["lib/util".to_string()]);
}
