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

use crate::Node;

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block comment standing in for a statement the cleanup phase disabled.
///
/// The text is the exact printed form of the replaced statement; any `*/`
/// inside it (only possible within a string literal) is defanged so the
/// comment cannot terminate early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentStatement {
    /// The commented-out source text.
    pub text: String,
    pub span: Span,
}

impl fmt::Display for CommentStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/* [cleanup] {} */", self.text.replace("*/", "*\\/"))
    }
}

crate::simple_node_impl!(CommentStatement);
