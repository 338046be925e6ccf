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
use crate::Block;

/// The body of an arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    /// A braced body, e.g., `(x) => { return x; }`.
    Block(Block),
    /// An expression body, e.g., `(x) => x + 1`.
    Expression(Box<Expression>),
}

/// An arrow function, e.g., `(a, b) => a + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunction {
    /// The parameter names.
    pub params: Vec<Identifier>,
    /// The function body.
    pub body: ArrowBody,
    pub span: Span,
}

impl fmt::Display for ArrowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") => ")?;
        match &self.body {
            ArrowBody::Block(block) => write!(f, "{block}"),
            // An object literal body would be misread as a block.
            ArrowBody::Expression(expr) if matches!(&**expr, Expression::Object(_)) => write!(f, "({expr})"),
            ArrowBody::Expression(expr) => write_expr(f, expr, prec::ASSIGNMENT),
        }
    }
}

crate::simple_node_impl!(ArrowFunction);
