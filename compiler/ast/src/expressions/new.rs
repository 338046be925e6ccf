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

/// A constructor call, e.g., `new Foo(1, 2)`.
///
/// The argument list is always printed, even when empty, so `new Foo` and
/// `new Foo()` share one printed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpression {
    /// The constructed callee.
    pub callee: Box<Expression>,
    /// The constructor arguments.
    pub arguments: Vec<Expression>,
    pub span: Span,
}

impl fmt::Display for NewExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new ")?;
        write_expr(f, &self.callee, prec::MEMBER)?;
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

crate::simple_node_impl!(NewExpression);
