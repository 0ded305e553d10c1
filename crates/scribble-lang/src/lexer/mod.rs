//! Lexer utilities and tokenization for Scribble.

pub mod tokenizer;
pub mod winnow;

pub use tokenizer::{lex, literal_text};
