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

use crate::{DeclarationKind, Expression, Identifier, Node, Statement, VariableDeclaration};

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `while (cond) body` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    /// The loop condition.
    pub condition: Expression,
    /// The loop body.
    pub body: Box<Statement>,
    pub span: Span,
}

impl fmt::Display for WhileStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while ({}) {}", self.condition, self.body)
    }
}

crate::simple_node_impl!(WhileStatement);

/// A `do body while (cond);` loop.
///
/// Its body is an initializer context: it runs at load time regardless of the
/// condition, so calls inside it are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileStatement {
    /// The loop body.
    pub body: Box<Statement>,
    /// The loop condition.
    pub condition: Expression,
    pub span: Span,
}

impl fmt::Display for DoWhileStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "do {} while ({});", self.body, self.condition)
    }
}

crate::simple_node_impl!(DoWhileStatement);

/// The first slot of a C-style `for` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    None,
    Declaration(VariableDeclaration),
    Expression(Expression),
}

impl fmt::Display for ForInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForInit::None => Ok(()),
            ForInit::Declaration(declaration) => write!(f, "{declaration}"),
            ForInit::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

/// A C-style `for (init; cond; update) body` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub init: ForInit,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub span: Span,
}

impl fmt::Display for ForStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for ({};", self.init)?;
        if let Some(condition) = &self.condition {
            write!(f, " {condition}")?;
        }
        write!(f, ";")?;
        if let Some(update) = &self.update {
            write!(f, " {update}")?;
        }
        write!(f, ") {}", self.body)
    }
}

crate::simple_node_impl!(ForStatement);

/// A `for (k in obj) body` or `for (v of arr) body` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInStatement {
    /// The declaration keyword, absent when the binding is a bare name.
    pub kind: Option<DeclarationKind>,
    /// The bound name.
    pub binding: Identifier,
    /// Whether this is a `for … of` loop.
    pub is_of: bool,
    /// The iterated object.
    pub object: Expression,
    /// The loop body.
    pub body: Box<Statement>,
    pub span: Span,
}

impl fmt::Display for ForInStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for (")?;
        if let Some(kind) = &self.kind {
            write!(f, "{kind} ")?;
        }
        let keyword = if self.is_of { "of" } else { "in" };
        write!(f, "{} {} {}) {}", self.binding, keyword, self.object, self.body)
    }
}

crate::simple_node_impl!(ForInStatement);
