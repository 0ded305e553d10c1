use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Keyword {
    #[display("var")]
    Var,
    #[display("const")]
    Const,
    #[display("func")]
    Func,
    #[display("intrinsic")]
    Intrinsic,
    #[display("if")]
    If,
    #[display("elif")]
    Elif,
    #[display("else")]
    Else,
    #[display("switch")]
    Switch,
    #[display("case")]
    Case,
    #[display("default")]
    Default,
    #[display("while")]
    While,
    #[display("for")]
    For,
    #[display("return")]
    Return,
    #[display("break")]
    Break,
    #[display("continue")]
    Continue,
    #[display("import")]
    Import,
    #[display("true")]
    True,
    #[display("false")]
    False,
}

impl Keyword {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "var" => Some(Self::Var),
            "const" => Some(Self::Const),
            "func" => Some(Self::Func),
            "intrinsic" => Some(Self::Intrinsic),
            "if" => Some(Self::If),
            "elif" => Some(Self::Elif),
            "else" => Some(Self::Else),
            "switch" => Some(Self::Switch),
            "case" => Some(Self::Case),
            "default" => Some(Self::Default),
            "while" => Some(Self::While),
            "for" => Some(Self::For),
            "return" => Some(Self::Return),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            "import" => Some(Self::Import),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCode {
    Whitespace,
    NewLine,
    Comment,

    Identifier,
    Keyword(Keyword),
    Integer,
    HexInteger,
    Float,
    DoubleQuotedString,
    SingleQuotedString,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Tilde,
    Bang,
    Equals,
    EqualsEquals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    ShiftLeft,
    ShiftRight,
    LogicalAnd,
    LogicalOr,
    PlusEquals,
    MinusEquals,
    AsteriskEquals,
    SlashEquals,
    PercentEquals,
    Arrow,
    Dot,
    Comma,
    Colon,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,

    Unknown,
    Unterminated,
    EndOfFile,
}

impl TokenCode {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenCode::Whitespace | TokenCode::NewLine | TokenCode::Comment
        )
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let code = match symbol {
            "+" => TokenCode::Plus,
            "-" => TokenCode::Minus,
            "*" => TokenCode::Asterisk,
            "/" => TokenCode::Slash,
            "%" => TokenCode::Percent,
            "&" => TokenCode::Ampersand,
            "|" => TokenCode::Pipe,
            "~" => TokenCode::Tilde,
            "!" => TokenCode::Bang,
            "=" => TokenCode::Equals,
            "==" => TokenCode::EqualsEquals,
            "!=" => TokenCode::NotEquals,
            "<" => TokenCode::Less,
            "<=" => TokenCode::LessEquals,
            ">" => TokenCode::Greater,
            ">=" => TokenCode::GreaterEquals,
            "<<" => TokenCode::ShiftLeft,
            ">>" => TokenCode::ShiftRight,
            "&&" => TokenCode::LogicalAnd,
            "||" => TokenCode::LogicalOr,
            "+=" => TokenCode::PlusEquals,
            "-=" => TokenCode::MinusEquals,
            "*=" => TokenCode::AsteriskEquals,
            "/=" => TokenCode::SlashEquals,
            "%=" => TokenCode::PercentEquals,
            "->" => TokenCode::Arrow,
            "." => TokenCode::Dot,
            "," => TokenCode::Comma,
            ":" => TokenCode::Colon,
            ";" => TokenCode::Semicolon,
            "(" => TokenCode::OpenParen,
            ")" => TokenCode::CloseParen,
            "[" => TokenCode::OpenBracket,
            "]" => TokenCode::CloseBracket,
            "{" => TokenCode::OpenBrace,
            "}" => TokenCode::CloseBrace,
            _ => return None,
        };
        Some(code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub code: TokenCode,
    pub value: String,
    pub location: Span,
}

impl Token {
    pub fn new(code: TokenCode, value: impl Into<String>, location: Span) -> Self {
        Self {
            code,
            value: value.into(),
            location,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.code == TokenCode::Keyword(keyword)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            TokenCode::EndOfFile => write!(f, "end of input"),
            TokenCode::NewLine => write!(f, "newline"),
            _ => write!(f, "'{}'", self.value),
        }
    }
}
