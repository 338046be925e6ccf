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

use thiserror::Error;

/// Errors raised while serializing or deserializing the syntax tree.
#[derive(Debug, Error)]
pub enum AstError {
    #[error("failed to convert the syntax tree to JSON: {error}")]
    FailedToConvertAstToJson { error: serde_json::Error },

    #[error("failed to write the syntax tree snapshot to `{path}`: {error}")]
    FailedToWriteAstSnapshot { path: std::path::PathBuf, error: std::io::Error },
}
