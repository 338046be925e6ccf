// Copyright (C) 2024-2025 The dejs authors.
// This file is part of the dejs library.

// The dejs library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The dejs library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the dejs library. If not, see <https://www.gnu.org/licenses/>.

use super::*;

/// A binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UnsignedShr,
    In,
    Instanceof,
}

impl BinaryOperation {
    /// The source token of the operator.
    pub fn as_str(self) -> &'static str {
        use BinaryOperation::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Eq => "==",
            NotEq => "!=",
            StrictEq => "===",
            StrictNotEq => "!==",
            Lt => "<",
            LtEq => "<=",
            Gt => ">",
            GtEq => ">=",
            And => "&&",
            Or => "||",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Shl => "<<",
            Shr => ">>",
            UnsignedShr => ">>>",
            In => "in",
            Instanceof => "instanceof",
        }
    }

    pub(crate) fn precedence(self) -> u8 {
        use BinaryOperation::*;
        match self {
            Or => prec::LOGICAL_OR,
            And => prec::LOGICAL_AND,
            BitOr => prec::BITWISE_OR,
            BitXor => prec::BITWISE_XOR,
            BitAnd => prec::BITWISE_AND,
            Eq | NotEq | StrictEq | StrictNotEq => prec::EQUALITY,
            Lt | LtEq | Gt | GtEq | In | Instanceof => prec::RELATIONAL,
            Shl | Shr | UnsignedShr => prec::SHIFT,
            Add | Sub => prec::ADDITIVE,
            Mul | Div | Mod => prec::MULTIPLICATIVE,
        }
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A binary expression, e.g., `42 + 24`. Logical `&&`/`||` are binary
/// operations here as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    /// The left operand.
    pub left: Box<Expression>,
    /// The right operand.
    pub right: Box<Expression>,
    /// The operator.
    pub op: BinaryOperation,
    pub span: Span,
}

impl fmt::Display for BinaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Left associativity: the right operand needs one level more.
        write_expr(f, &self.left, self.op.precedence())?;
        write!(f, " {} ", self.op)?;
        write_expr(f, &self.right, self.op.precedence() + 1)
    }
}

crate::simple_node_impl!(BinaryExpression);
