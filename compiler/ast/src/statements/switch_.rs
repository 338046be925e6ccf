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

use crate::{Expression, Indent, Node, Statement};

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `case expr:` or `default:` arm of a `switch` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// The matched expression, absent for `default:`.
    pub test: Option<Expression>,
    /// The statements of the arm; fallthrough is preserved.
    pub body: Vec<Statement>,
    pub span: Span,
}

impl fmt::Display for SwitchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            Some(test) => writeln!(f, "case {test}:")?,
            None => writeln!(f, "default:")?,
        }
        for (i, statement) in self.body.iter().enumerate() {
            if i + 1 == self.body.len() {
                write!(f, "{}", Indent(statement))?;
            } else {
                writeln!(f, "{}", Indent(statement))?;
            }
        }
        Ok(())
    }
}

crate::simple_node_impl!(SwitchCase);

/// A `switch (expr) { … }` statement, the usual carrier of flattened control
/// flow in obfuscated bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    /// The switched-on expression.
    pub discriminant: Expression,
    /// The arms in source order.
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

impl fmt::Display for SwitchStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "switch ({}) {{", self.discriminant)?;
        for case in &self.cases {
            writeln!(f, "{}", Indent(case))?;
        }
        write!(f, "}}")
    }
}

crate::simple_node_impl!(SwitchStatement);
