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

//! # dejs
//!
//! A static deobfuscator for machine-generated JavaScript helpers. It
//! partially evaluates calls whose arguments are literal constants, replaces
//! each call with the value it would produce at run time, and optionally
//! erases helpers that become dead after substitution.
//!
//! The pipeline: literal normalization → parsing → helper classification →
//! call extraction → dependency resolution → sandboxed evaluation →
//! rewriting → cleanup. See [`Deobfuscator`] for the entry point and
//! [`DeobfuscatorOptions`] for the knobs.

pub use dejs_ast as ast;
pub use dejs_errors as errors;
pub use dejs_parser as parser;
pub use dejs_passes as passes;
pub use dejs_span as span;

pub use dejs_compiler::{DeobfuscationOutput, DeobfuscationReport, Deobfuscator, DeobfuscatorOptions};
pub use dejs_errors::{DejsError, Result};
pub use dejs_passes::CleanupMode;
