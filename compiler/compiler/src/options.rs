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

use dejs_passes::CleanupMode;

use std::{path::PathBuf, time::Duration};

/// The configuration of one deobfuscation run. Immutable once the run
/// starts; the command-line collaborator translates its flags into this
/// record.
#[derive(Clone, Debug)]
pub struct DeobfuscatorOptions {
    /// Regular expression selecting helper routines by name.
    pub intercept_pattern: String,
    /// Optional regular expression further restricting which helpers are
    /// evaluated (not which are extracted).
    pub function_name_filter: Option<String>,
    /// Inclusive lower bound of the argument-count window for rewriting.
    pub min_args: usize,
    /// Inclusive upper bound of the argument-count window for rewriting.
    pub max_args: usize,
    /// Fold the reversed-string idiom before parsing.
    pub string_reverse: bool,
    /// Evaluate and rewrite helper calls.
    pub function_calls: bool,
    /// Evaluate but do not rewrite.
    pub disable_replace: bool,
    /// What to do with provably dead helpers after rewriting.
    pub cleanup_mode: CleanupMode,
    /// Wall-clock budget for the sandbox.
    pub timeout: Duration,
    /// Chatty progress reporting. Diagnostics only.
    pub verbose: bool,
    /// Dump intermediate state. Diagnostics only.
    pub debug: bool,
    /// Log each assembled driver line. Diagnostics only.
    pub trace_lines: bool,
    /// Where to write the JSON call trace, if anywhere.
    pub debug_output_path: Option<PathBuf>,
}

impl Default for DeobfuscatorOptions {
    fn default() -> Self {
        Self {
            intercept_pattern: r"^f(?:0x)?[\da-f]+$".to_string(),
            function_name_filter: None,
            min_args: 4,
            max_args: 6,
            string_reverse: true,
            function_calls: true,
            disable_replace: false,
            cleanup_mode: CleanupMode::None,
            timeout: Duration::from_secs(30),
            verbose: false,
            debug: false,
            trace_lines: false,
            debug_output_path: None,
        }
    }
}
