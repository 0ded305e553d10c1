use scribble_core::token::TokenCode;
use winnow::combinator::{alt, cut_err, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{literal, one_of, take_till, take_until, take_while};
use winnow::{ModalResult, Parser};

pub(crate) const MULTI_PUNCT: &[&str] = &[
    "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "->",
];
pub(crate) const SINGLE_PUNCT: &str = "+-*/%&|~!=<>.,:;()[]{}";

pub(crate) fn whitespace(input: &mut &str) -> ModalResult<TokenCode> {
    take_while(1.., |c: char| c == ' ' || c == '\t' || c == '\r')
        .map(|_| TokenCode::Whitespace)
        .parse_next(input)
}

pub(crate) fn newline(input: &mut &str) -> ModalResult<TokenCode> {
    literal("\n").map(|_| TokenCode::NewLine).parse_next(input)
}

pub(crate) fn line_comment(input: &mut &str) -> ModalResult<TokenCode> {
    literal("//").parse_next(input)?;
    take_till(0.., |c: char| c == '\n').parse_next(input)?;
    Ok(TokenCode::Comment)
}

/// Fails with `Cut` when the comment is never closed.
pub(crate) fn block_comment(input: &mut &str) -> ModalResult<TokenCode> {
    literal("/*").parse_next(input)?;
    cut_err(take_until(0.., "*/")).parse_next(input)?;
    literal("*/").parse_next(input)?;
    Ok(TokenCode::Comment)
}

pub(crate) fn number(input: &mut &str) -> ModalResult<TokenCode> {
    alt((hex_number, decimal_number)).parse_next(input)
}

/// `0x` with no digits still lexes; the parser reports the malformed number.
fn hex_number(input: &mut &str) -> ModalResult<TokenCode> {
    alt((literal("0x"), literal("0X"))).parse_next(input)?;
    take_while(0.., |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    Ok(TokenCode::HexInteger)
}

fn decimal_number(input: &mut &str) -> ModalResult<TokenCode> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let fraction = opt((literal("."), take_while(1.., |c: char| c.is_ascii_digit())))
        .parse_next(input)?;
    let exponent = opt((
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        take_while(1.., |c: char| c.is_ascii_digit()),
    ))
    .parse_next(input)?;
    if fraction.is_some() || exponent.is_some() {
        Ok(TokenCode::Float)
    } else {
        Ok(TokenCode::Integer)
    }
}

pub(crate) fn identifier(input: &mut &str) -> ModalResult<TokenCode> {
    (
        take_while(1.., is_ident_start),
        take_while(0.., is_ident_continue),
    )
        .map(|_| TokenCode::Identifier)
        .parse_next(input)
}

pub(crate) fn double_quoted(input: &mut &str) -> ModalResult<TokenCode> {
    quoted(input, '"').map(|_| TokenCode::DoubleQuotedString)
}

pub(crate) fn single_quoted(input: &mut &str) -> ModalResult<TokenCode> {
    quoted(input, '\'').map(|_| TokenCode::SingleQuotedString)
}

/// Consumes a quoted literal including both quotes. Backslash escapes the
/// next character; a missing closing quote is a `Cut`.
fn quoted(input: &mut &str, quote: char) -> ModalResult<()> {
    let slice = *input;
    if !slice.starts_with(quote) {
        return Err(backtrack_err());
    }
    let mut escape = false;
    for (idx, ch) in slice.char_indices().skip(1) {
        if escape {
            escape = false;
            continue;
        }
        if ch == '\\' {
            escape = true;
        } else if ch == quote {
            *input = &slice[idx + ch.len_utf8()..];
            return Ok(());
        }
    }
    Err(ErrMode::Cut(ContextError::new()))
}

pub(crate) fn punctuation(input: &mut &str) -> ModalResult<TokenCode> {
    let symbol = alt((multi_punct, single_punct)).parse_next(input)?;
    TokenCode::from_symbol(symbol).ok_or_else(backtrack_err)
}

fn multi_punct<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    let slice = *input;
    for sym in MULTI_PUNCT {
        if slice.starts_with(*sym) {
            let (matched, rest) = slice.split_at(sym.len());
            *input = rest;
            return Ok(matched);
        }
    }
    Err(backtrack_err())
}

fn single_punct<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1..=1, |c: char| SINGLE_PUNCT.contains(c)).parse_next(input)
}

pub(crate) fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

pub(crate) fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

pub(crate) fn backtrack_err() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Resolves backslash escapes in the body of a quoted literal. Unknown
/// escapes stand for the escaped character itself.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
