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

pub mod ast;
pub use ast::*;

pub mod cli;
pub use cli::*;

pub mod interpreter;
pub use interpreter::*;

pub mod parser;
pub use parser::*;

pub mod pass;
pub use pass::*;

use thiserror::Error;

/// The umbrella error type for the dejs deobfuscator.
#[derive(Debug, Error)]
pub enum DejsError {
    #[error(transparent)]
    AstError(#[from] AstError),

    #[error(transparent)]
    CliError(#[from] CliError),

    #[error(transparent)]
    InterpreterError(#[from] InterpreterError),

    #[error(transparent)]
    ParserError(#[from] ParserError),

    #[error(transparent)]
    PassError(#[from] PassError),
}
