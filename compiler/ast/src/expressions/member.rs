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

/// The property side of a member access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberProperty {
    /// A dot access, e.g., the `prop` in `obj.prop`.
    Identifier(Identifier),
    /// A bracketed access, e.g., the `k + 1` in `obj[k + 1]`.
    Computed(Box<Expression>),
}

/// A member access, e.g., `obj.prop` or `obj[key]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    /// The accessed object.
    pub object: Box<Expression>,
    /// The accessed property.
    pub property: MemberProperty,
    pub span: Span,
}

impl fmt::Display for MemberExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `5.toString()` is a syntax error, so an integer-literal object is
        // always parenthesized.
        if matches!(&*self.object, Expression::Literal(Literal::Integer(..))) {
            write!(f, "({})", self.object)?;
        } else {
            write_expr(f, &self.object, prec::CALL)?;
        }
        match &self.property {
            MemberProperty::Identifier(name) => write!(f, ".{name}"),
            MemberProperty::Computed(key) => {
                write!(f, "[")?;
                write_expr(f, key, prec::SEQUENCE)?;
                write!(f, "]")
            }
        }
    }
}

crate::simple_node_impl!(MemberExpression);
