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

//! Error types for the dejs deobfuscator.
//!
//! Each phase of the pipeline has its own error family; [`DejsError`] is the
//! umbrella the public API surfaces. The pipeline is shrink-only: every error
//! either aborts the run before any output is produced (parse failures, I/O)
//! or degrades the run to a no-op rewrite (sandbox failures), so no partial
//! tree is ever printed.

pub mod errors;
pub use errors::*;

/// A result type whose error is [`DejsError`].
pub type Result<T, E = DejsError> = core::result::Result<T, E>;
