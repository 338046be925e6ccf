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

/// The key of an object-literal property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    /// An identifier key, e.g., `a` in `{ a: 1 }`.
    Identifier(Identifier),
    /// A string key, e.g., `"a b"` in `{ "a b": 1 }`. The value is unescaped.
    String(String, Span),
    /// A numeric key, e.g., `0` in `{ 0: 1 }`. The source text is kept.
    Numeric(String, Span),
    /// A computed key, e.g., `[k]` in `{ [k]: 1 }`.
    Computed(Box<Expression>),
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Identifier(name) => write!(f, "{name}"),
            PropertyKey::String(value, _) => write!(f, "{}", quote_string(value)),
            PropertyKey::Numeric(text, _) => write!(f, "{text}"),
            PropertyKey::Computed(expr) => write!(f, "[{expr}]"),
        }
    }
}

/// One `key: value` entry of an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Expression,
    pub span: Span,
}

impl fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.key)?;
        write_expr(f, &self.value, prec::ASSIGNMENT)
    }
}

crate::simple_node_impl!(ObjectProperty);

/// An object literal, e.g., `{ a: 1, "b c": 2 }`.
///
/// Shorthand properties are normalized to `key: value` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    /// The properties in source order.
    pub properties: Vec<ObjectProperty>,
    pub span: Span,
}

impl fmt::Display for ObjectExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{ ")?;
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{property}")?;
        }
        write!(f, " }}")
    }
}

crate::simple_node_impl!(ObjectExpression);
