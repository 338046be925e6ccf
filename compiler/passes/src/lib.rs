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

//! The deobfuscation passes.
//!
//! Each pass reads and updates the shared [`DeobfuscatorState`] through the
//! [`Pass`] interface. The pipeline order is fixed: string normalization runs
//! before parsing, then classification, call extraction, dependency
//! resolution, sandboxed evaluation, rewriting and cleanup, each completing
//! before the next starts.

pub mod common;
pub use common::*;

pub mod pass;
pub use pass::*;

pub mod call_extraction;
pub use call_extraction::*;

pub mod cleanup;
pub use cleanup::*;

pub mod dependency_resolution;
pub use dependency_resolution::*;

pub mod evaluation;
pub use evaluation::*;

pub mod helper_classification;
pub use helper_classification::*;

pub mod reverse_strings;
pub use reverse_strings::*;

pub mod rewriting;
pub use rewriting::*;
