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

/// An increment or decrement operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOperation {
    Increment,
    Decrement,
}

impl UpdateOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperation::Increment => "++",
            UpdateOperation::Decrement => "--",
        }
    }
}

impl fmt::Display for UpdateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An increment or decrement, e.g., `i++` or `--i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpression {
    /// The updated place.
    pub operand: Box<Expression>,
    /// The operator.
    pub op: UpdateOperation,
    /// Whether the operator is written before the operand.
    pub prefix: bool,
    pub span: Span,
}

impl fmt::Display for UpdateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix {
            write!(f, "{}", self.op)?;
            write_expr(f, &self.operand, prec::UNARY)
        } else {
            write_expr(f, &self.operand, prec::POSTFIX)?;
            write!(f, "{}", self.op)
        }
    }
}

crate::simple_node_impl!(UpdateExpression);
