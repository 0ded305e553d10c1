use scribble_core::ast::Operator;
use scribble_core::token::TokenCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// How one token behaves in expression position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDef {
    pub token: TokenCode,
    pub binary: Option<Operator>,
    pub unary: Option<Operator>,
    pub binary_precedence: u8,
    pub unary_precedence: u8,
    pub associativity: Associativity,
}

pub const UNARY_PRECEDENCE: u8 = 14;
pub const POSTFIX_PRECEDENCE: u8 = 15;

impl OperatorDef {
    const fn binary(token: TokenCode, op: Operator, precedence: u8) -> Self {
        Self {
            token,
            binary: Some(op),
            unary: None,
            binary_precedence: precedence,
            unary_precedence: 0,
            associativity: Associativity::Left,
        }
    }

    const fn assignment(token: TokenCode, op: Operator) -> Self {
        Self {
            associativity: Associativity::Right,
            ..Self::binary(token, op, 1)
        }
    }

    const fn prefix(token: TokenCode, op: Operator) -> Self {
        Self {
            token,
            binary: None,
            unary: Some(op),
            binary_precedence: 0,
            unary_precedence: UNARY_PRECEDENCE,
            associativity: Associativity::Left,
        }
    }

    const fn with_prefix(self, op: Operator) -> Self {
        Self {
            unary: Some(op),
            unary_precedence: UNARY_PRECEDENCE,
            ..self
        }
    }

    pub fn is_binary(&self) -> bool {
        self.binary.is_some()
    }

    pub fn is_unary(&self) -> bool {
        self.unary.is_some()
    }
}

pub static OPERATORS: &[OperatorDef] = &[
    OperatorDef::assignment(TokenCode::Equals, Operator::Assign),
    OperatorDef::assignment(TokenCode::PlusEquals, Operator::AddAssign),
    OperatorDef::assignment(TokenCode::MinusEquals, Operator::SubtractAssign),
    OperatorDef::assignment(TokenCode::AsteriskEquals, Operator::MultiplyAssign),
    OperatorDef::assignment(TokenCode::SlashEquals, Operator::DivideAssign),
    OperatorDef::assignment(TokenCode::PercentEquals, Operator::ModuloAssign),
    OperatorDef::binary(TokenCode::LogicalOr, Operator::LogicalOr, 3),
    OperatorDef::binary(TokenCode::LogicalAnd, Operator::LogicalAnd, 4),
    OperatorDef::binary(TokenCode::Pipe, Operator::BitwiseOr, 5),
    OperatorDef::binary(TokenCode::Ampersand, Operator::BitwiseAnd, 7),
    OperatorDef::binary(TokenCode::EqualsEquals, Operator::Equals, 8),
    OperatorDef::binary(TokenCode::NotEquals, Operator::NotEquals, 8),
    OperatorDef::binary(TokenCode::Less, Operator::Less, 9),
    OperatorDef::binary(TokenCode::LessEquals, Operator::LessEquals, 9),
    OperatorDef::binary(TokenCode::Greater, Operator::Greater, 9),
    OperatorDef::binary(TokenCode::GreaterEquals, Operator::GreaterEquals, 9),
    OperatorDef::binary(TokenCode::ShiftLeft, Operator::ShiftLeft, 10),
    OperatorDef::binary(TokenCode::ShiftRight, Operator::ShiftRight, 10),
    OperatorDef::binary(TokenCode::Plus, Operator::Add, 11).with_prefix(Operator::Identity),
    OperatorDef::binary(TokenCode::Minus, Operator::Subtract, 11).with_prefix(Operator::Negate),
    OperatorDef::binary(TokenCode::Asterisk, Operator::Multiply, 12),
    OperatorDef::binary(TokenCode::Slash, Operator::Divide, 12),
    OperatorDef::binary(TokenCode::Percent, Operator::Modulo, 12),
    OperatorDef::prefix(TokenCode::Bang, Operator::LogicalNot),
    OperatorDef::prefix(TokenCode::Tilde, Operator::BitwiseNot),
    OperatorDef::binary(TokenCode::Dot, Operator::Member, POSTFIX_PRECEDENCE),
    OperatorDef::binary(TokenCode::OpenParen, Operator::Call, POSTFIX_PRECEDENCE),
    OperatorDef::binary(TokenCode::OpenBracket, Operator::Subscript, POSTFIX_PRECEDENCE),
];

pub fn operator_def(code: TokenCode) -> Option<&'static OperatorDef> {
    OPERATORS.iter().find(|def| def.token == code)
}

pub fn binary_def(code: TokenCode) -> Option<&'static OperatorDef> {
    operator_def(code).filter(|def| def.is_binary())
}

pub fn unary_def(code: TokenCode) -> Option<&'static OperatorDef> {
    operator_def(code).filter(|def| def.is_unary())
}

/// Binding strength of `op` in the position it was parsed in.
pub fn precedence(op: Operator) -> u8 {
    OPERATORS
        .iter()
        .find_map(|def| {
            if def.binary == Some(op) {
                Some(def.binary_precedence)
            } else if def.unary == Some(op) {
                Some(def.unary_precedence)
            } else {
                None
            }
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_appears_once() {
        for def in OPERATORS {
            let count = OPERATORS.iter().filter(|d| d.token == def.token).count();
            assert_eq!(count, 1, "{:?} listed twice", def.token);
        }
    }

    #[test]
    fn minus_is_both_binary_and_prefix() {
        let def = operator_def(TokenCode::Minus).unwrap();
        assert_eq!(def.binary, Some(Operator::Subtract));
        assert_eq!(def.unary, Some(Operator::Negate));
        assert_eq!(precedence(Operator::Negate), UNARY_PRECEDENCE);
        assert_eq!(precedence(Operator::Subtract), 11);
    }

    #[test]
    fn assignment_is_right_associative_and_loosest() {
        let def = binary_def(TokenCode::PlusEquals).unwrap();
        assert_eq!(def.associativity, Associativity::Right);
        assert!(OPERATORS
            .iter()
            .filter(|d| d.is_binary())
            .all(|d| d.binary_precedence >= def.binary_precedence));
    }
}
