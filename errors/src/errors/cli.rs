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

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the command-line collaborator around the core pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read `{path}`: {error}")]
    FileRead { path: PathBuf, error: std::io::Error },

    #[error("failed to write `{path}`: {error}")]
    FileWrite { path: PathBuf, error: std::io::Error },

    #[error("failed to back up `{path}` to `{backup}`: {error}")]
    Backup { path: PathBuf, backup: PathBuf, error: std::io::Error },

    #[error("failed to write the debug trace to `{path}`: {error}")]
    TraceWrite { path: PathBuf, error: std::io::Error },
}
