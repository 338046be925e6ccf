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

//! The abstract syntax tree (ast) for the JavaScript subset dejs rewrites.
//!
//! This module contains the [`Ast`] type, a wrapper around the [`Program`]
//! type. The [`Ast`] type is intended to be parsed and modified by the
//! deobfuscation passes. Printing any node with `Display` yields source text
//! that parses back to a structurally equal tree; the printer is the identity
//! the result map is keyed on, so it must stay deterministic.

pub mod common;
pub use self::common::*;

pub mod expressions;
pub use self::expressions::*;

pub mod indent_display;
pub use self::indent_display::*;

pub mod passes;
pub use self::passes::*;

pub mod program;
pub use self::program::*;

pub mod statements;
pub use self::statements::*;

use dejs_errors::{AstError, Result};

/// The abstract syntax tree (AST) for a program in the JavaScript subset.
///
/// The [`Ast`] type represents a program as a series of recursive data types
/// forming a tree that begins from a [`Program`] type root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    pub ast: Program,
}

use serde::{Deserialize, Serialize};

impl Ast {
    /// Creates a new AST from a given program tree.
    pub fn new(program: Program) -> Self {
        Self { ast: program }
    }

    /// Returns a reference to the inner program AST representation.
    pub fn as_repr(&self) -> &Program {
        &self.ast
    }

    pub fn into_repr(self) -> Program {
        self.ast
    }

    /// Serializes the ast into a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.ast).map_err(|error| AstError::FailedToConvertAstToJson { error }.into())
    }

    /// Serializes the ast into a JSON file.
    pub fn to_json_file(&self, path: &std::path::Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)
            .map_err(|error| AstError::FailedToWriteAstSnapshot { path: path.to_path_buf(), error }.into())
    }

    /// Deserializes a JSON string into an ast.
    pub fn from_json_string(json: &str) -> Result<Self> {
        let ast: Program =
            serde_json::from_str(json).map_err(|error| AstError::FailedToConvertAstToJson { error })?;
        Ok(Self { ast })
    }
}

impl AsRef<Program> for Ast {
    fn as_ref(&self) -> &Program {
        &self.ast
    }
}

impl std::fmt::Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ast.fmt(f)
    }
}
