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

/// A function call expression, e.g., `f(args)` or `obj.method(args)`.
///
/// The printed form of a call node is the identity the evaluation result map
/// is keyed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    /// An expression evaluating to the callable.
    pub callee: Box<Expression>,
    /// Expressions for the arguments passed to the callable.
    pub arguments: Vec<Expression>,
    /// Span of the entire call `callee(arguments)`.
    pub span: Span,
}

impl fmt::Display for CallExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.callee, prec::CALL)?;
        write!(f, "(")?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_expr(f, argument, prec::ASSIGNMENT)?;
        }
        write!(f, ")")
    }
}

crate::simple_node_impl!(CallExpression);
