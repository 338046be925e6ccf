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

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the sandboxed evaluator.
///
/// Resource errors fail the whole evaluation rather than hang it; a thrown
/// value only fails the single call the harness wrapped it in.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("evaluation exceeded the {limit:?} time limit")]
    Timeout { limit: Duration },

    #[error("evaluation exceeded the step budget of {limit}")]
    StepLimitExceeded { limit: u64 },

    #[error("evaluation exceeded the recursion depth limit of {limit}")]
    RecursionLimitExceeded { limit: usize },

    #[error("uncaught value thrown in the sandbox: {message}")]
    Thrown { message: String },
}
