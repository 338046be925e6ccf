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

use crate::{
    Expression, Identifier, Node,
    expressions::{prec, write_expr},
};

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declaration keyword of a variable declaration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Var => write!(f, "var"),
            DeclarationKind::Let => write!(f, "let"),
            DeclarationKind::Const => write!(f, "const"),
        }
    }
}

/// One `name = init` entry of a variable declaration.
///
/// A declarator whose initializer is an inline function literal is a
/// function-valued binding, one of the two helper definition shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    /// The bound name.
    pub name: Identifier,
    /// The initializer, if any.
    pub init: Option<Expression>,
    pub span: Span,
}

impl fmt::Display for VariableDeclarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(init) = &self.init {
            write!(f, " = ")?;
            write_expr(f, init, prec::ASSIGNMENT)?;
        }
        Ok(())
    }
}

crate::simple_node_impl!(VariableDeclarator);

/// A variable declaration, e.g., `var x = 1, y;`.
///
/// The trailing `;` belongs to the statement position, so a declaration can
/// also print inside a `for` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// The declaration keyword.
    pub kind: DeclarationKind,
    /// The declared names, in source order.
    pub declarators: Vec<VariableDeclarator>,
    pub span: Span,
}

impl fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind)?;
        for (i, declarator) in self.declarators.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{declarator}")?;
        }
        Ok(())
    }
}

crate::simple_node_impl!(VariableDeclaration);
