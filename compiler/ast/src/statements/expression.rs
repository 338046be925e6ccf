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

use crate::{Expression, Node};

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// An expression statement, e.g., `f(1);` or `(function () { … })();`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    /// The expression evaluated for its effect.
    pub expression: Expression,
    pub span: Span,
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A leading `function` or `{` would be misread as a declaration or a
        // block, so such expressions print parenthesized.
        if self.expression.starts_ambiguously() {
            write!(f, "({});", self.expression)
        } else {
            write!(f, "{};", self.expression)
        }
    }
}

crate::simple_node_impl!(ExpressionStatement);
