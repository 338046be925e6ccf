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

/// An assignment operator, simple or compound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOperation {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    UnsignedShrAssign,
}

impl AssignmentOperation {
    pub fn as_str(self) -> &'static str {
        use AssignmentOperation::*;
        match self {
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            BitAndAssign => "&=",
            BitOrAssign => "|=",
            BitXorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            UnsignedShrAssign => ">>>=",
        }
    }

    /// The binary operation a compound assignment applies, if any.
    pub fn binary_op(self) -> Option<BinaryOperation> {
        use AssignmentOperation::*;
        Some(match self {
            Assign => return None,
            AddAssign => BinaryOperation::Add,
            SubAssign => BinaryOperation::Sub,
            MulAssign => BinaryOperation::Mul,
            DivAssign => BinaryOperation::Div,
            ModAssign => BinaryOperation::Mod,
            BitAndAssign => BinaryOperation::BitAnd,
            BitOrAssign => BinaryOperation::BitOr,
            BitXorAssign => BinaryOperation::BitXor,
            ShlAssign => BinaryOperation::Shl,
            ShrAssign => BinaryOperation::Shr,
            UnsignedShrAssign => BinaryOperation::UnsignedShr,
        })
    }
}

impl fmt::Display for AssignmentOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An assignment, e.g., `x = 1` or `obj.k += 2`.
///
/// The parser only produces identifier and member targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    /// The assigned place.
    pub target: Box<Expression>,
    /// The assigned value.
    pub value: Box<Expression>,
    /// The operator.
    pub op: AssignmentOperation,
    pub span: Span,
}

impl fmt::Display for AssignmentExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.target, self.op)?;
        write_expr(f, &self.value, prec::ASSIGNMENT)
    }
}

crate::simple_node_impl!(AssignmentExpression);
