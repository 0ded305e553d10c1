use super::winnow::{
    block_comment, double_quoted, identifier, line_comment, newline, number, punctuation,
    single_quoted, unescape, whitespace,
};
use scribble_core::span::{FileId, Span};
use scribble_core::token::{Keyword, Token, TokenCode};
use winnow::combinator::alt;
use winnow::error::ErrMode;
use winnow::{ModalResult, Parser};

/// Splits `source` into tokens, trivia included, and always terminates the
/// stream with an `EndOfFile` token. Lexing never fails: characters that
/// start no token become `Unknown`, and a string, character literal or
/// block comment that never closes swallows the rest of the input as a
/// single `Unterminated` token.
pub fn lex(source: &str, file: FileId) -> Vec<Token> {
    let mut input = source;
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut column = 1u32;

    while !input.is_empty() {
        let start = source.len() - input.len();
        let code = match next_token(&mut input) {
            Ok(code) => code,
            Err(ErrMode::Cut(_)) => {
                input = "";
                TokenCode::Unterminated
            }
            Err(_) => {
                let mut rest = source[start..].chars();
                rest.next();
                input = rest.as_str();
                TokenCode::Unknown
            }
        };
        let end = source.len() - input.len();
        let lexeme = &source[start..end];
        let code = match code {
            TokenCode::Identifier => Keyword::from_lexeme(lexeme)
                .map(TokenCode::Keyword)
                .unwrap_or(TokenCode::Identifier),
            other => other,
        };
        let location = Span::new(file, start as u32, end as u32, line, column);
        for ch in lexeme.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        tokens.push(Token::new(code, lexeme, location));
    }

    let end = source.len() as u32;
    tokens.push(Token::new(
        TokenCode::EndOfFile,
        "",
        Span::new(file, end, end, line, column),
    ));
    tracing::trace!(file, count = tokens.len(), "lexed buffer");
    tokens
}

fn next_token(input: &mut &str) -> ModalResult<TokenCode> {
    alt((
        newline,
        whitespace,
        line_comment,
        block_comment,
        number,
        identifier,
        double_quoted,
        single_quoted,
        punctuation,
    ))
    .parse_next(input)
}

/// Contents of a string or character token with quotes stripped and
/// escapes resolved.
pub fn literal_text(token: &Token) -> String {
    let raw = token.value.as_str();
    let body = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    unescape(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes(source: &str) -> Vec<TokenCode> {
        lex(source, 0)
            .into_iter()
            .map(|token| token.code)
            .filter(|code| !code.is_trivia())
            .collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            codes("var x = 0x1F + 2.5e3;"),
            vec![
                TokenCode::Keyword(Keyword::Var),
                TokenCode::Identifier,
                TokenCode::Equals,
                TokenCode::HexInteger,
                TokenCode::Plus,
                TokenCode::Float,
                TokenCode::Semicolon,
                TokenCode::EndOfFile,
            ]
        );
    }

    #[test]
    fn prefers_longest_operator() {
        assert_eq!(
            codes("a <<= b -> c && !d"),
            vec![
                TokenCode::Identifier,
                TokenCode::ShiftLeft,
                TokenCode::Equals,
                TokenCode::Identifier,
                TokenCode::Arrow,
                TokenCode::Identifier,
                TokenCode::LogicalAnd,
                TokenCode::Bang,
                TokenCode::Identifier,
                TokenCode::EndOfFile,
            ]
        );
    }

    #[test]
    fn member_access_on_integer_is_not_a_float() {
        assert_eq!(
            codes("1.x"),
            vec![
                TokenCode::Integer,
                TokenCode::Dot,
                TokenCode::Identifier,
                TokenCode::EndOfFile
            ]
        );
    }

    #[test]
    fn keeps_trivia_and_tracks_lines() {
        let tokens = lex("a // note\n  b", 3);
        let kinds: Vec<_> = tokens.iter().map(|t| t.code).collect();
        assert_eq!(
            kinds,
            vec![
                TokenCode::Identifier,
                TokenCode::Whitespace,
                TokenCode::Comment,
                TokenCode::NewLine,
                TokenCode::Whitespace,
                TokenCode::Identifier,
                TokenCode::EndOfFile,
            ]
        );
        let b = &tokens[5];
        assert_eq!(b.value, "b");
        assert_eq!((b.location.line, b.location.column), (2, 3));
        assert_eq!((b.location.lo, b.location.hi), (12, 13));
        assert_eq!(b.location.file, 3);
    }

    #[test]
    fn unterminated_string_swallows_rest() {
        let tokens = lex("x = \"abc\ny", 0);
        let last = &tokens[tokens.len() - 2];
        assert_eq!(last.code, TokenCode::Unterminated);
        assert_eq!(last.value, "\"abc\ny");
    }

    #[test]
    fn unknown_characters_are_single_tokens() {
        assert_eq!(
            codes("a @ b"),
            vec![
                TokenCode::Identifier,
                TokenCode::Unknown,
                TokenCode::Identifier,
                TokenCode::EndOfFile
            ]
        );
    }

    #[test]
    fn escapes_are_resolved() {
        let tokens = lex(r#""a\"b\n" '\''"#, 0);
        assert_eq!(literal_text(&tokens[0]), "a\"b\n");
        assert_eq!(literal_text(&tokens[2]), "'");
    }
}
