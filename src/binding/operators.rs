use lazy_static::lazy_static;

use crate::{lexer::tokens::TokenKind, symbols::symbols::TypeSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

impl BoundBinaryOperatorKind {
    /// Printing precedence, higher binds tighter. Matches the parser's
    /// binding powers.
    pub fn precedence(self) -> u8 {
        use BoundBinaryOperatorKind::*;

        match self {
            Multiplication | Division | Modulo => 5,
            Addition | Subtraction | BitwiseAnd | BitwiseOr | BitwiseXor | LeftShift
            | RightShift => 4,
            Equals | NotEquals | Less | LessOrEquals | Greater | GreaterOrEquals => 3,
            LogicalAnd => 2,
            LogicalOr => 1,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct BoundUnaryOperator {
    pub token: TokenKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub ty: TypeSymbol,
}

impl BoundUnaryOperator {
    fn new(token: TokenKind, kind: BoundUnaryOperatorKind, operand_type: TypeSymbol) -> Self {
        BoundUnaryOperator {
            token,
            kind,
            operand_type,
            ty: operand_type,
        }
    }

    /// Finds the operator for `token` applied to an operand of exactly
    /// `operand_type`. No conversions are considered.
    pub fn bind(token: TokenKind, operand_type: TypeSymbol) -> Option<&'static BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.token == token && op.operand_type == operand_type)
    }

    pub fn text(&self) -> &'static str {
        operator_text(self.token)
    }
}

#[derive(Debug, PartialEq)]
pub struct BoundBinaryOperator {
    pub token: TokenKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub ty: TypeSymbol,
}

impl BoundBinaryOperator {
    fn new(token: TokenKind, kind: BoundBinaryOperatorKind, operand_type: TypeSymbol) -> Self {
        Self::with_result(token, kind, operand_type, operand_type)
    }

    fn with_result(
        token: TokenKind,
        kind: BoundBinaryOperatorKind,
        operand_type: TypeSymbol,
        ty: TypeSymbol,
    ) -> Self {
        BoundBinaryOperator {
            token,
            kind,
            left_type: operand_type,
            right_type: operand_type,
            ty,
        }
    }

    /// Finds the operator for `token` with operands of exactly `left_type`
    /// and `right_type`.
    pub fn bind(
        token: TokenKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
    ) -> Option<&'static BoundBinaryOperator> {
        BINARY_OPERATORS.iter().find(|op| {
            op.token == token && op.left_type == left_type && op.right_type == right_type
        })
    }

    pub fn text(&self) -> &'static str {
        operator_text(self.token)
    }
}

/// Source text of an operator token.
pub fn operator_text(token: TokenKind) -> &'static str {
    match token {
        TokenKind::Plus => "+",
        TokenKind::Dash => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Not => "!",
        TokenKind::Tilde => "~",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        TokenKind::Ampersand => "&",
        TokenKind::Pipe => "|",
        TokenKind::Hat => "^",
        TokenKind::LessLess => "<<",
        TokenKind::GreaterGreater => ">>",
        TokenKind::Equals => "==",
        TokenKind::NotEquals => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEquals => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEquals => ">=",
        other => panic!("{} is not an operator token", other),
    }
}

lazy_static! {
    static ref UNARY_OPERATORS: Vec<BoundUnaryOperator> = {
        use BoundUnaryOperatorKind::*;

        let mut operators = vec![BoundUnaryOperator::new(
            TokenKind::Not,
            LogicalNegation,
            TypeSymbol::Bool,
        )];

        for ty in [TypeSymbol::Int, TypeSymbol::Float, TypeSymbol::Double] {
            operators.push(BoundUnaryOperator::new(TokenKind::Plus, Identity, ty));
            operators.push(BoundUnaryOperator::new(TokenKind::Dash, Negation, ty));
        }

        operators.push(BoundUnaryOperator::new(TokenKind::Tilde, OnesComplement, TypeSymbol::Int));
        operators
    };

    static ref BINARY_OPERATORS: Vec<BoundBinaryOperator> = {
        use BoundBinaryOperatorKind::*;

        let mut operators = vec![];

        for ty in [TypeSymbol::Int, TypeSymbol::Float, TypeSymbol::Double] {
            operators.push(BoundBinaryOperator::new(TokenKind::Plus, Addition, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Dash, Subtraction, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Star, Multiplication, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Slash, Division, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Percent, Modulo, ty));

            for (token, kind) in [
                (TokenKind::Equals, Equals),
                (TokenKind::NotEquals, NotEquals),
                (TokenKind::Less, Less),
                (TokenKind::LessEquals, LessOrEquals),
                (TokenKind::Greater, Greater),
                (TokenKind::GreaterEquals, GreaterOrEquals),
            ] {
                operators.push(BoundBinaryOperator::with_result(token, kind, ty, TypeSymbol::Bool));
            }
        }

        // Bitwise operators work on both ints and bools
        for ty in [TypeSymbol::Int, TypeSymbol::Bool] {
            operators.push(BoundBinaryOperator::new(TokenKind::Ampersand, BitwiseAnd, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Pipe, BitwiseOr, ty));
            operators.push(BoundBinaryOperator::new(TokenKind::Hat, BitwiseXor, ty));
        }

        operators.push(BoundBinaryOperator::new(TokenKind::LessLess, LeftShift, TypeSymbol::Int));
        operators.push(BoundBinaryOperator::new(TokenKind::GreaterGreater, RightShift, TypeSymbol::Int));

        operators.push(BoundBinaryOperator::new(TokenKind::And, LogicalAnd, TypeSymbol::Bool));
        operators.push(BoundBinaryOperator::new(TokenKind::Or, LogicalOr, TypeSymbol::Bool));

        for ty in [TypeSymbol::Bool, TypeSymbol::String] {
            operators.push(BoundBinaryOperator::with_result(TokenKind::Equals, Equals, ty, TypeSymbol::Bool));
            operators.push(BoundBinaryOperator::with_result(TokenKind::NotEquals, NotEquals, ty, TypeSymbol::Bool));
        }

        operators.push(BoundBinaryOperator::new(TokenKind::Plus, Addition, TypeSymbol::String));
        operators
    };
}
