//! Scribble parser: recursive descent over statements and precedence
//! climbing over expressions, driven by the static table in [`operators`].
//!
//! The parser never fails outright. Errors are collected per statement and
//! parsing resumes at the next statement boundary. When the input ends in the
//! middle of a construct the tree gets an `Incomplete` node (or an unclosed
//! block) so interactive callers can ask [`SyntaxNode::is_complete`] whether
//! to wait for more input.

mod expr;
pub mod operators;
mod stmt;

use crate::context::ParserContext;
use crate::lexer::lex;
use scribble_core::ast::{Block, Incomplete, Module, Node, NodeKind, SyntaxNode};
use scribble_core::diagnostics::ProcessResult;
use scribble_core::error::{ErrorCode, SyntaxError};
use scribble_core::span::{FileId, Span};
use scribble_core::token::{Token, TokenCode};
use std::sync::Arc;

pub(crate) type PResult<T> = Result<T, SyntaxError>;

pub(crate) struct Parser<'c> {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<SyntaxError>,
    context: &'c mut ParserContext,
    module: String,
}

impl<'c> Parser<'c> {
    /// `tokens` must end with an `EndOfFile` token; trivia is dropped.
    pub(crate) fn new(tokens: &[Token], module: &str, context: &'c mut ParserContext) -> Self {
        let tokens = tokens
            .iter()
            .filter(|token| !token.code.is_trivia())
            .cloned()
            .collect();
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            context,
            module: module.to_string(),
        }
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_code(&self) -> TokenCode {
        self.current().code
    }

    fn at(&self, code: TokenCode) -> bool {
        self.peek_code() == code
    }

    fn at_end(&self) -> bool {
        self.at(TokenCode::EndOfFile)
    }

    /// Returns the current token and moves past it; the end token is sticky.
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.code != TokenCode::EndOfFile {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, code: TokenCode) -> Option<Token> {
        if self.at(code) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, code: TokenCode, expected: &str) -> PResult<Token> {
        match self.eat(code) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    /// Error for the current token, classified by what went wrong with it.
    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        let (code, message) = match token.code {
            TokenCode::EndOfFile => (
                ErrorCode::UnexpectedEndOfInput,
                format!("expected {expected}, found end of input"),
            ),
            TokenCode::Unterminated => (
                ErrorCode::UnterminatedLiteral,
                format!("unterminated literal {}", token.value.trim_end()),
            ),
            TokenCode::Unknown => (
                ErrorCode::UnknownCharacter,
                format!("unknown character {token}"),
            ),
            _ => (
                ErrorCode::UnexpectedToken,
                format!("expected {expected}, found {token}"),
            ),
        };
        SyntaxError::new(token.location, code, message)
    }

    /// Ends a simple statement. A missing `;` is tolerated at end of input.
    fn end_statement(&mut self) -> PResult<()> {
        if self.eat(TokenCode::Semicolon).is_some() || self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    fn report(&mut self, error: SyntaxError) {
        tracing::debug!(module = %self.module, error = %error, "syntax error");
        self.errors.push(error);
    }

    /// Reports that input ran out, once per parse.
    fn report_end_of_input(&mut self, expected: &str) {
        let already = self.errors.iter().any(|err| {
            matches!(
                err.code,
                ErrorCode::UnexpectedEndOfInput | ErrorCode::UnterminatedLiteral
            )
        });
        if !already {
            let error = self.unexpected(expected);
            self.report(error);
        }
    }

    /// Statement-level recovery. Running out of input yields an `Incomplete`
    /// node; any other error skips to the next `;` or up to the next `}`.
    fn recover(&mut self, error: SyntaxError) -> Option<Node> {
        let incomplete = matches!(
            error.code,
            ErrorCode::UnexpectedEndOfInput | ErrorCode::UnterminatedLiteral
        );
        let location = error.location;
        let expected = error.message.clone();
        if incomplete {
            self.report_end_of_input_error(error);
            return Some(SyntaxNode::node(
                location,
                NodeKind::Incomplete(Incomplete { expected }),
            ));
        }
        self.report(error);
        self.synchronize();
        None
    }

    fn report_end_of_input_error(&mut self, error: SyntaxError) {
        let duplicate = self
            .errors
            .iter()
            .any(|err| err.code == error.code && err.location == error.location);
        if !duplicate {
            self.report(error);
        }
    }

    /// Skips the rest of a broken statement, including any braced body it
    /// opened. Stops before a `}` that closes an enclosing block.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_code() {
                TokenCode::EndOfFile => return,
                TokenCode::CloseBrace if depth == 0 => return,
                TokenCode::CloseBrace => {
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                TokenCode::OpenBrace => {
                    self.advance();
                    depth += 1;
                }
                TokenCode::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Top-level statements up to end of input. A stray `}` is reported and
    /// skipped.
    fn statements_to_end(&mut self) -> Vec<Node> {
        let mut statements = Vec::new();
        while !self.at_end() {
            if self.at(TokenCode::CloseBrace) {
                let error = self.unexpected("statement");
                self.report(error);
                self.advance();
                continue;
            }
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
        }
        statements
    }

    fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

/// Parses one buffer into a `Module` node named `name`. The result always
/// carries the module; syntax errors ride along in the diagnostics.
pub fn parse_module(name: &str, buffer: Arc<str>, context: &mut ParserContext) -> ProcessResult {
    let file = context.allocate_file();
    let tokens = lex(&buffer, file);
    let mut parser = Parser::new(&tokens, name, context);
    let statements = parser.statements_to_end();
    let errors = parser.into_errors();
    tracing::debug!(
        module = name,
        file,
        statements = statements.len(),
        errors = errors.len(),
        "parsed module"
    );

    let location = module_span(file, &buffer);
    let block = SyntaxNode::node(
        location,
        NodeKind::Block(Block {
            statements,
            closed: true,
        }),
    );
    let module = SyntaxNode::node(
        location,
        NodeKind::Module(Module {
            name: name.to_string(),
            block,
            buffer,
            tokens: Some(Arc::new(tokens)),
        }),
    );
    let mut result = ProcessResult::success(module);
    result.extend_errors(errors);
    result
}

/// Parses a standalone expression, rejecting trailing input.
pub fn parse_expression(source: &str) -> Result<Node, Vec<SyntaxError>> {
    let mut context = ParserContext::new();
    let file: FileId = context.allocate_file();
    let tokens = lex(source, file);
    let mut parser = Parser::new(&tokens, "<expression>", &mut context);
    let parsed = parser.expression().and_then(|expr| {
        if parser.at_end() {
            Ok(expr)
        } else {
            Err(parser.unexpected("end of input"))
        }
    });
    match parsed {
        Ok(expr) => Ok(expr),
        Err(error) => {
            parser.report(error);
            Err(parser.into_errors())
        }
    }
}

fn module_span(file: FileId, buffer: &str) -> Span {
    Span::new(file, 0, buffer.len() as u32, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ProcessResult {
        let mut ctx = ParserContext::new();
        parse_module("test", Arc::from(source), &mut ctx)
    }

    fn render(source: &str) -> String {
        let result = parse(source);
        assert!(!result.is_error(), "{:?}", result.errors());
        result.value().unwrap().to_string()
    }

    #[test]
    fn renders_statements() {
        assert_eq!(
            render("var x = 1 + 2 * 3; if x > 3 { x = 0; } else x -= 1;"),
            "var x = (1 + (2 * 3));\nif (x > 3) {\n    (x = 0);\n} else (x -= 1);\n"
        );
    }

    #[test]
    fn recovers_at_statement_boundary() {
        let result = parse("var = 1; var y = 2;");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].code, ErrorCode::UnexpectedToken);
        let module = result.value().unwrap().as_module().unwrap().block.clone();
        assert_eq!(module.as_block().unwrap().statements.len(), 1);
    }

    #[test]
    fn stray_close_brace_is_reported() {
        let result = parse("1; } 2;");
        assert_eq!(result.errors().len(), 1);
        let module = result.value().unwrap().as_module().unwrap().block.clone();
        assert_eq!(module.as_block().unwrap().statements.len(), 2);
    }

    #[test]
    fn unknown_character_is_located() {
        let result = parse("var a = 1;\nvar b = @;");
        let error = &result.errors()[0];
        assert_eq!(error.code, ErrorCode::UnknownCharacter);
        assert_eq!((error.location.line, error.location.column), (2, 9));
    }

    #[test]
    fn standalone_expression_rejects_trailing_tokens() {
        assert!(parse_expression("1 + 2").is_ok());
        let errors = parse_expression("1 + 2 3").unwrap_err();
        assert_eq!(errors[0].code, ErrorCode::UnexpectedToken);
    }
}
