use scribble_core::ast::{Node, NodeKind, Operator};
use scribble_lang::parse_expression;

fn parse_expr(src: &str) -> Node {
    parse_expression(src).unwrap_or_else(|e| panic!("parse failed for `{src}`: {e:?}"))
}

fn binary(node: &Node) -> (&Node, Operator, &Node) {
    match node.kind() {
        NodeKind::BinaryExpression(expr) => (&expr.lhs, expr.op, &expr.rhs),
        other => panic!("expected binary expression, got {other:?}"),
    }
}

fn is_identifier(node: &Node, name: &str) -> bool {
    node.as_identifier()
        .map(|ident| ident.name == name)
        .unwrap_or(false)
}

#[test]
fn precedence_mul_over_add() {
    let expr = parse_expr("1 + 2 * 3");
    let (_, op, rhs) = binary(&expr);
    assert_eq!(op, Operator::Add);
    assert_eq!(binary(rhs).1, Operator::Multiply);
}

#[test]
fn left_associative_subtraction() {
    let expr = parse_expr("1 - 2 - 3");
    let (lhs, op, _) = binary(&expr);
    assert_eq!(op, Operator::Subtract);
    assert_eq!(binary(lhs).1, Operator::Subtract);
}

#[test]
fn left_associative_division() {
    let expr = parse_expr("8 / 4 / 2");
    let (lhs, op, _) = binary(&expr);
    assert_eq!(op, Operator::Divide);
    assert_eq!(binary(lhs).1, Operator::Divide);
}

#[test]
fn assignment_is_right_associative() {
    let expr = parse_expr("a = b = 3");
    let (lhs, op, rhs) = binary(&expr);
    assert_eq!(op, Operator::Assign);
    assert!(is_identifier(lhs, "a"));
    let (inner_lhs, inner_op, _) = binary(rhs);
    assert_eq!(inner_op, Operator::Assign);
    assert!(is_identifier(inner_lhs, "b"));
}

#[test]
fn comparison_binds_looser_than_shift() {
    let expr = parse_expr("a << 1 < b");
    let (lhs, op, _) = binary(&expr);
    assert_eq!(op, Operator::Less);
    assert_eq!(binary(lhs).1, Operator::ShiftLeft);
}

#[test]
fn call_arguments_form_expression_list() {
    let expr = parse_expr("f(1, a + 2)");
    let (callee, op, args) = binary(&expr);
    assert_eq!(op, Operator::Call);
    assert!(is_identifier(callee, "f"));
    let list = args.as_expression_list().expect("argument list");
    assert_eq!(list.expressions.len(), 2);
}

#[test]
fn negation_wraps_qualified_access() {
    let expr = parse_expr("-math.pi");
    let NodeKind::UnaryExpression(unary) = expr.kind() else {
        panic!("expected unary at the root, got {expr:?}");
    };
    assert_eq!(unary.op, Operator::Negate);
    let (lhs, op, rhs) = binary(&unary.operand);
    assert_eq!(op, Operator::Member);
    assert!(is_identifier(lhs, "math"));
    assert!(is_identifier(rhs, "pi"));
}

#[test]
fn negation_stays_inside_multiplication() {
    let expr = parse_expr("-a * b");
    let (lhs, op, _) = binary(&expr);
    assert_eq!(op, Operator::Multiply);
    assert!(matches!(lhs.kind(), NodeKind::UnaryExpression(_)));
}

#[test]
fn rendering_reparses_to_same_shape() {
    for src in [
        "1 - 2 - 3",
        "a = b = c + 1",
        "-x.y(1)[2] * 3 << 1",
        "!a && b || c == d",
        "f(g(1), h[2]) % 7",
        "~1 | 2 & 3",
    ] {
        let first = parse_expr(src).to_string();
        let second = parse_expr(&first).to_string();
        assert_eq!(first, second, "rendering of `{src}` is not stable");
    }
}
