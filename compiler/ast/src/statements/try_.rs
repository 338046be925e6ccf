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

use crate::{Block, Identifier, Node};

use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `catch (param) { … }` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// The caught binding, absent in a bare `catch { … }`.
    pub param: Option<Identifier>,
    /// The handler body.
    pub body: Block,
    pub span: Span,
}

impl fmt::Display for CatchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "catch ({param}) {}", self.body),
            None => write!(f, "catch {}", self.body),
        }
    }
}

crate::simple_node_impl!(CatchClause);

/// A `try { … } catch (e) { … } finally { … }` statement.
///
/// Its blocks form an initializer context: error-handling setup runs at load
/// time, so calls inside it are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    /// The protected block.
    pub block: Block,
    /// The handler, if any.
    pub handler: Option<CatchClause>,
    /// The `finally` block, if any.
    pub finalizer: Option<Block>,
    pub span: Span,
}

impl fmt::Display for TryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "try {}", self.block)?;
        if let Some(handler) = &self.handler {
            write!(f, " {handler}")?;
        }
        if let Some(finalizer) = &self.finalizer {
            write!(f, " finally {finalizer}")?;
        }
        Ok(())
    }
}

crate::simple_node_impl!(TryStatement);
