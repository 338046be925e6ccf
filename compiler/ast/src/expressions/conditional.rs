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

/// The ternary conditional `cond ? if_expr : else_expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpression {
    /// The tested condition.
    pub test: Box<Expression>,
    /// The expression produced when the condition is truthy.
    pub consequent: Box<Expression>,
    /// The expression produced when the condition is falsy.
    pub alternate: Box<Expression>,
    pub span: Span,
}

impl fmt::Display for ConditionalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.test, prec::CONDITIONAL + 1)?;
        write!(f, " ? ")?;
        write_expr(f, &self.consequent, prec::ASSIGNMENT)?;
        write!(f, " : ")?;
        write_expr(f, &self.alternate, prec::ASSIGNMENT)
    }
}

crate::simple_node_impl!(ConditionalExpression);
