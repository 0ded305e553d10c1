use super::operators::{binary_def, precedence, unary_def, Associativity, UNARY_PRECEDENCE};
use super::{PResult, Parser};
use crate::lexer::literal_text;
use scribble_core::ast::{
    BinaryExpression, ExpressionList, Identifier, Node, NodeKind, Operator, SyntaxNode,
    UnaryExpression,
};
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::token::{Keyword, Token, TokenCode};
use scribble_core::value::Int;

impl Parser<'_> {
    pub(crate) fn expression(&mut self) -> PResult<Node> {
        let (lhs, grouped) = self.operand()?;
        self.expression_1(lhs, grouped, 0)
    }

    /// Precedence climbing: folds every binary operator binding at least as
    /// tightly as `min_precedence` into `lhs`. A `grouped` lhs was written in
    /// parentheses and keeps its prefix operator inside.
    fn expression_1(
        &mut self,
        mut lhs: Node,
        mut grouped: bool,
        min_precedence: u8,
    ) -> PResult<Node> {
        while let Some(def) = self.peek_binary(min_precedence) {
            let Some(op) = def.binary else { break };
            let op_token = self.advance();
            let rhs = match op {
                Operator::Call => self.bracketed(op_token, TokenCode::CloseParen, "')'")?,
                Operator::Subscript => {
                    self.bracketed(op_token, TokenCode::CloseBracket, "']'")?
                }
                Operator::Member => self.member_name()?,
                _ if def.associativity == Associativity::Right => self.expression()?,
                _ => {
                    let (mut rhs, mut rhs_grouped) = self.operand()?;
                    while self.peek_binary(def.binary_precedence + 1).is_some() {
                        rhs = self.expression_1(rhs, rhs_grouped, def.binary_precedence + 1)?;
                        rhs_grouped = false;
                    }
                    rhs
                }
            };
            lhs = if grouped {
                build_binary(lhs, op, rhs)
            } else {
                binary(lhs, op, rhs)
            };
            grouped = false;
        }
        Ok(lhs)
    }

    fn peek_binary(&self, min_precedence: u8) -> Option<&'static super::operators::OperatorDef> {
        binary_def(self.peek_code()).filter(|def| def.binary_precedence >= min_precedence)
    }

    fn member_name(&mut self) -> PResult<Node> {
        let token = self.expect(TokenCode::Identifier, "member name")?;
        Ok(identifier(&token))
    }

    /// Comma separated expressions up to `close`. The list spans both brackets.
    fn bracketed(&mut self, open: Token, close: TokenCode, expected: &str) -> PResult<Node> {
        let mut expressions = Vec::new();
        let end = loop {
            if let Some(end) = self.eat(close) {
                break end;
            }
            if !expressions.is_empty() {
                self.expect(TokenCode::Comma, &format!("',' or {expected}"))?;
            }
            expressions.push(self.expression()?);
        };
        Ok(SyntaxNode::node(
            open.location.merge(&end.location),
            NodeKind::ExpressionList(ExpressionList { expressions }),
        ))
    }

    /// A primary, flagged when it was a parenthesised expression.
    fn operand(&mut self) -> PResult<(Node, bool)> {
        if self.peek_code() == TokenCode::OpenParen {
            return Ok((self.parenthesized()?, true));
        }
        Ok((self.primary()?, false))
    }

    fn parenthesized(&mut self) -> PResult<Node> {
        self.advance();
        let inner = self.expression()?;
        self.expect(TokenCode::CloseParen, "')'")?;
        Ok(inner)
    }

    pub(crate) fn primary(&mut self) -> PResult<Node> {
        let token = self.current().clone();
        if let Some(def) = unary_def(token.code) {
            if let Some(op) = def.unary {
                self.advance();
                let operand = self.primary()?;
                let location = token.location.merge(&operand.location);
                return Ok(SyntaxNode::node(
                    location,
                    NodeKind::UnaryExpression(UnaryExpression { op, operand }),
                ));
            }
        }
        let kind = match token.code {
            TokenCode::Integer => NodeKind::IntegerLiteral(integer(&token, &token.value, 10)?),
            TokenCode::HexInteger => {
                NodeKind::IntegerLiteral(integer(&token, &token.value[2..], 16)?)
            }
            TokenCode::Float => NodeKind::FloatLiteral(token.value.parse::<f64>().map_err(|_| {
                SyntaxError::from_code(token.location, ErrorCode::MalformedNumber)
            })?),
            TokenCode::DoubleQuotedString => NodeKind::StringLiteral(literal_text(&token)),
            TokenCode::SingleQuotedString => {
                let text = literal_text(&token);
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => NodeKind::CharLiteral(ch),
                    _ => {
                        return Err(SyntaxError::new(
                            token.location,
                            ErrorCode::MalformedCharLiteral,
                            format!(
                                "character literal {} must contain exactly one character",
                                token.value
                            ),
                        ))
                    }
                }
            }
            TokenCode::Keyword(Keyword::True) => NodeKind::BooleanLiteral(true),
            TokenCode::Keyword(Keyword::False) => NodeKind::BooleanLiteral(false),
            TokenCode::Identifier => {
                self.advance();
                return Ok(identifier(&token));
            }
            TokenCode::OpenParen => return self.parenthesized(),
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(SyntaxNode::node(token.location, kind))
    }
}

fn identifier(token: &Token) -> Node {
    SyntaxNode::node(
        token.location,
        NodeKind::Identifier(Identifier {
            name: token.value.clone(),
        }),
    )
}

fn integer(token: &Token, digits: &str, radix: u32) -> PResult<Int> {
    u64::from_str_radix(digits, radix)
        .map(Int::from_u64)
        .map_err(|_| {
            SyntaxError::new(
                token.location,
                ErrorCode::MalformedNumber,
                format!("malformed integer literal {token}"),
            )
        })
}

/// Builds `lhs op rhs`. When `lhs` is a prefix expression and `op` binds
/// tighter than prefix operators, the prefix is moved outward so `-a.b`
/// reads as `-(a.b)`. Applied once per constructed node.
fn binary(lhs: Node, op: Operator, rhs: Node) -> Node {
    if let NodeKind::UnaryExpression(unary) = &lhs.kind {
        if precedence(op) > UNARY_PRECEDENCE {
            let inner = build_binary(unary.operand.clone(), op, rhs);
            let location = lhs.location.merge(&inner.location);
            return SyntaxNode::node(
                location,
                NodeKind::UnaryExpression(UnaryExpression {
                    op: unary.op,
                    operand: inner,
                }),
            );
        }
    }
    build_binary(lhs, op, rhs)
}

fn build_binary(lhs: Node, op: Operator, rhs: Node) -> Node {
    let location = lhs.location.merge(&rhs.location);
    SyntaxNode::node(
        location,
        NodeKind::BinaryExpression(BinaryExpression { lhs, op, rhs }),
    )
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_expression;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        parse_expression(source).unwrap().to_string()
    }

    #[test]
    fn binary_operators_group_by_table() {
        assert_eq!(render("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(render("1 + 2 * 3 - 4"), "((1 + (2 * 3)) - 4)");
        assert_eq!(render("a || b && c | d & e"), "(a || (b && (c | (d & e))))");
        assert_eq!(render("1 << 2 + 3 < 4 == true"), "(((1 << (2 + 3)) < 4) == true)");
    }

    #[test]
    fn assignment_groups_right_to_left() {
        assert_eq!(render("a = b = 3"), "(a = (b = 3))");
        assert_eq!(render("a += b -= 1 + 2"), "(a += (b -= (1 + 2)))");
    }

    #[test]
    fn postfix_chains() {
        assert_eq!(render("f(1, 2)[0]"), "f(1, 2)[0]");
        assert_eq!(render("a.b.c(x)"), "a.b.c(x)");
        assert_eq!(render("1 + g()"), "(1 + g())");
    }

    #[test]
    fn prefix_moves_outside_postfix_operators() {
        assert_eq!(render("-a.b"), "(-a.b)");
        assert_eq!(render("-f(1)"), "(-f(1))");
        assert_eq!(render("-2 * 3"), "((-2) * 3)");
        assert_eq!(render("!a == b"), "((!a) == b)");
    }

    #[test]
    fn parenthesised_prefix_stays_inside() {
        assert_eq!(render("(-f)(1)"), "(-f)(1)");
        assert_eq!(render("(-a).b"), "(-a).b");
        assert_eq!(render("1 + (-f)(2)"), "(1 + (-f)(2))");
        assert_eq!(render("(-f)(1)"), render(&render("(-f)(1)")));
    }

    #[test]
    fn literals() {
        assert_eq!(render("0xff"), "255");
        assert_eq!(render("1.5e2"), "150.0");
        assert_eq!(render("'a'"), "'a'");
        assert_eq!(render(r#""a\tb""#), r#""a\tb""#);
        assert_eq!(render("18446744073709551615"), "18446744073709551615");
    }
}
