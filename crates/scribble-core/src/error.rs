use crate::span::Span;
use thiserror::Error;

/// Every failure the front end or the interpreter can report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ErrorCode {
    // Lexing and parsing
    UnexpectedToken,
    UnexpectedEndOfInput,
    UnknownCharacter,
    UnterminatedLiteral,
    MalformedNumber,
    MalformedCharLiteral,
    MalformedParameterList,

    // Module resolution
    ModuleNotFound,
    CyclicImport,

    // Evaluation
    UndeclaredVariable,
    AlreadyDeclaredVariable,
    CannotAssignToRValue,
    CannotAssignToConstant,
    ArgumentTypeMismatch,
    ArgumentCountMismatch,
    IntegerOverflow,
    DivisionByZero,
    IndexOutOfRange,
    ConversionError,
    NotCallable,
    UndeclaredCommand,
    UnknownIntrinsic,
    MisplacedControlFlow,
    UnexpectedNodeType,
    ExecutionError,
    InternalError,
}

impl ErrorCode {
    /// Short human readable description used when no better message exists.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::UnexpectedEndOfInput => "unexpected end of input",
            ErrorCode::UnknownCharacter => "unknown character",
            ErrorCode::UnterminatedLiteral => "unterminated literal",
            ErrorCode::MalformedNumber => "malformed number",
            ErrorCode::MalformedCharLiteral => "character literal must contain exactly one character",
            ErrorCode::MalformedParameterList => "malformed parameter list",
            ErrorCode::ModuleNotFound => "module not found",
            ErrorCode::CyclicImport => "cyclic import",
            ErrorCode::UndeclaredVariable => "undeclared variable",
            ErrorCode::AlreadyDeclaredVariable => "variable already declared",
            ErrorCode::CannotAssignToRValue => "cannot assign to an rvalue",
            ErrorCode::CannotAssignToConstant => "cannot assign to a constant",
            ErrorCode::ArgumentTypeMismatch => "argument type mismatch",
            ErrorCode::ArgumentCountMismatch => "wrong number of arguments",
            ErrorCode::IntegerOverflow => "integer overflow",
            ErrorCode::DivisionByZero => "division by zero",
            ErrorCode::IndexOutOfRange => "index out of range",
            ErrorCode::ConversionError => "value cannot be converted",
            ErrorCode::NotCallable => "value is not callable",
            ErrorCode::UndeclaredCommand => "no such command",
            ErrorCode::UnknownIntrinsic => "no such intrinsic",
            ErrorCode::MisplacedControlFlow => "control flow statement outside of its construct",
            ErrorCode::UnexpectedNodeType => "unexpected node type",
            ErrorCode::ExecutionError => "execution error",
            ErrorCode::InternalError => "internal error",
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ErrorCode::UnexpectedToken
                | ErrorCode::UnexpectedEndOfInput
                | ErrorCode::UnknownCharacter
                | ErrorCode::UnterminatedLiteral
                | ErrorCode::MalformedNumber
                | ErrorCode::MalformedCharLiteral
                | ErrorCode::MalformedParameterList
        )
    }
}

/// A located diagnostic. Used for parse failures as well as evaluation
/// failures surfaced by the interpreter.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{location}: {message} [{code}]")]
pub struct SyntaxError {
    pub location: Span,
    pub code: ErrorCode,
    pub message: String,
}

impl SyntaxError {
    pub fn new(location: Span, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            location,
            code,
            message: message.into(),
        }
    }

    pub fn from_code(location: Span, code: ErrorCode) -> Self {
        Self::new(location, code, code.description())
    }
}

/// An unlocated evaluation failure. Value and command code produce these;
/// the interpreter attaches the location of the offending node.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct Fault {
    pub code: ErrorCode,
    pub message: String,
}

impl Fault {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn at(self, location: Span) -> SyntaxError {
        SyntaxError::new(location, self.code, self.message)
    }
}

impl From<ErrorCode> for Fault {
    fn from(code: ErrorCode) -> Self {
        Fault::new(code, code.description())
    }
}

pub type Result<T, E = SyntaxError> = std::result::Result<T, E>;
