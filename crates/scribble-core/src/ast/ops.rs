#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseAnd,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    // prefix
    Negate,
    Identity,
    LogicalNot,
    BitwiseNot,
    // postfix-ish binaries
    Member,
    Call,
    Subscript,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::AddAssign => "+=",
            Operator::SubtractAssign => "-=",
            Operator::MultiplyAssign => "*=",
            Operator::DivideAssign => "/=",
            Operator::ModuloAssign => "%=",
            Operator::LogicalOr => "||",
            Operator::LogicalAnd => "&&",
            Operator::BitwiseOr => "|",
            Operator::BitwiseAnd => "&",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Less => "<",
            Operator::LessEquals => "<=",
            Operator::Greater => ">",
            Operator::GreaterEquals => ">=",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Add | Operator::Identity => "+",
            Operator::Subtract | Operator::Negate => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::LogicalNot => "!",
            Operator::BitwiseNot => "~",
            Operator::Member => ".",
            Operator::Call => "(",
            Operator::Subscript => "[",
        }
    }

    pub fn is_assignment(&self) -> bool {
        self.compound_base().is_some() || *self == Operator::Assign
    }

    /// The arithmetic operator a compound assignment applies, `+` for `+=`.
    pub fn compound_base(&self) -> Option<Operator> {
        match self {
            Operator::AddAssign => Some(Operator::Add),
            Operator::SubtractAssign => Some(Operator::Subtract),
            Operator::MultiplyAssign => Some(Operator::Multiply),
            Operator::DivideAssign => Some(Operator::Divide),
            Operator::ModuloAssign => Some(Operator::Modulo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
