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

//! The recursive-descent parser over the token stream.

pub mod context;
pub use context::*;

mod expression;
mod program;
mod statement;

use crate::tokenizer::SpannedToken;

use dejs_ast::Program;
use dejs_errors::Result;

/// Parses a token stream into a program tree.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Program> {
    let mut context = ParserContext::new(tokens);
    context.parse_program()
}
