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

use crate::{ExtractedSet, HelperSet, PureCall};

use dejs_ast::Ast;
use dejs_errors::{PassError, Result};
use dejs_interpreter::{CapturedValue, Limits};

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::time::Duration;

/// The evaluation results, keyed by the printed form of each call site.
pub type ResultMap = IndexMap<String, CapturedValue>;

/// The per-run configuration the passes consult.
#[derive(Clone, Debug)]
pub struct PassConfiguration {
    /// Selects helper routines by name.
    pub intercept_pattern: Regex,
    /// Further restricts which helpers are evaluated, not which are
    /// extracted.
    pub function_name_filter: Option<Regex>,
    /// Inclusive lower bound on a rewritable call's argument count.
    pub min_args: usize,
    /// Inclusive upper bound on a rewritable call's argument count.
    pub max_args: usize,
    /// Wall-clock budget for the sandbox.
    pub timeout: Duration,
    /// Log every driver line the harness assembles.
    pub trace_lines: bool,
}

impl PassConfiguration {
    pub fn new(
        intercept_pattern: &str,
        function_name_filter: Option<&str>,
        min_args: usize,
        max_args: usize,
        timeout: Duration,
        trace_lines: bool,
    ) -> Result<Self> {
        let intercept_pattern = Regex::new(intercept_pattern).map_err(|error| {
            PassError::InvalidInterceptPattern { pattern: intercept_pattern.to_string(), error }
        })?;
        let function_name_filter = function_name_filter
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|error| PassError::InvalidNameFilter { pattern: pattern.to_string(), error })
            })
            .transpose()?;
        Ok(Self { intercept_pattern, function_name_filter, min_args, max_args, timeout, trace_lines })
    }

    /// Is `name` a helper name under the intercept pattern?
    pub fn intercepts(&self, name: &str) -> bool {
        self.intercept_pattern.is_match(name)
    }

    /// Does `name` pass both the intercept pattern and the optional filter?
    pub fn evaluates(&self, name: &str) -> bool {
        self.intercepts(name)
            && self.function_name_filter.as_ref().is_none_or(|filter| filter.is_match(name))
    }

    /// Is `count` inside the rewrite window?
    pub fn within_window(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }

    /// The sandbox resource policy for this run.
    pub fn limits(&self) -> Limits {
        Limits { timeout: self.timeout, ..Limits::default() }
    }
}

/// The shared state the passes read and extend, in pipeline order.
pub struct DeobfuscatorState {
    pub ast: Ast,
    pub config: PassConfiguration,
    /// Helper definitions found by classification.
    pub helpers: HelperSet,
    /// Pure constant-argument call sites, in traversal order.
    pub pure_calls: Vec<PureCall>,
    /// Callee names rejected only by the argument-count window; they still
    /// seed the dependency closure.
    pub window_rejected: IndexSet<String>,
    /// The helpers whose definitions ship to the evaluator.
    pub extracted: ExtractedSet,
    /// The evaluation results.
    pub results: ResultMap,
    /// Per-helper count of call sites successfully rewritten.
    pub rewritten: IndexMap<String, usize>,
}

impl DeobfuscatorState {
    pub fn new(ast: Ast, config: PassConfiguration) -> Self {
        Self {
            ast,
            config,
            helpers: HelperSet::default(),
            pure_calls: Vec::new(),
            window_rejected: IndexSet::new(),
            extracted: ExtractedSet::default(),
            results: ResultMap::default(),
            rewritten: IndexMap::new(),
        }
    }
}

/// A deobfuscation pass.
///
/// Every pass has access to the whole [`DeobfuscatorState`], and may also
/// specify an `Input` and `Output`.
pub trait Pass {
    type Input;
    type Output;

    const NAME: &str;

    /// Runs the pass.
    fn do_pass(input: Self::Input, state: &mut DeobfuscatorState) -> Result<Self::Output>;
}
