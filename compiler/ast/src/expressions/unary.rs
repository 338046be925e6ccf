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

/// A prefix unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperation {
    /// The `-` operator. Applied to a numeric literal it forms a literal
    /// value as far as call-argument capture is concerned.
    Minus,
    /// The `+` operator.
    Plus,
    /// The `!` operator.
    Not,
    /// The `~` operator.
    BitNot,
    /// The `typeof` operator.
    Typeof,
    /// The `void` operator.
    Void,
    /// The `delete` operator.
    Delete,
}

impl UnaryOperation {
    pub fn as_str(self) -> &'static str {
        use UnaryOperation::*;
        match self {
            Minus => "-",
            Plus => "+",
            Not => "!",
            BitNot => "~",
            Typeof => "typeof",
            Void => "void",
            Delete => "delete",
        }
    }

    /// Word operators need a space before their operand.
    fn is_word(self) -> bool {
        matches!(self, UnaryOperation::Typeof | UnaryOperation::Void | UnaryOperation::Delete)
    }
}

impl fmt::Display for UnaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A prefix unary expression, e.g., `-x` or `typeof x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    /// The operand.
    pub operand: Box<Expression>,
    /// The operator.
    pub op: UnaryOperation,
    pub span: Span,
}

impl UnaryExpression {
    /// `- -x` must not print as `--x`.
    fn sign_clash(&self) -> bool {
        match (&self.op, &*self.operand) {
            (UnaryOperation::Minus, Expression::Unary(inner)) => inner.op == UnaryOperation::Minus,
            (UnaryOperation::Plus, Expression::Unary(inner)) => inner.op == UnaryOperation::Plus,
            (UnaryOperation::Minus, Expression::Update(inner)) => {
                inner.prefix && inner.op == UpdateOperation::Decrement
            }
            (UnaryOperation::Plus, Expression::Update(inner)) => {
                inner.prefix && inner.op == UpdateOperation::Increment
            }
            _ => false,
        }
    }
}

impl fmt::Display for UnaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if self.op.is_word() {
            write!(f, " ")?;
        }
        if self.sign_clash() {
            write!(f, "({})", self.operand)
        } else {
            write_expr(f, &self.operand, prec::UNARY)
        }
    }
}

crate::simple_node_impl!(UnaryExpression);
