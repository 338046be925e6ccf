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

//! The deobfuscator pipeline.
//!
//! The [`Deobfuscator`] type runs the phases in their fixed order: literal
//! normalization, parsing, helper classification, call extraction,
//! dependency resolution, sandboxed evaluation, rewriting, cleanup. The
//! pipeline is shrink-only: a parse failure aborts with the source untouched
//! on disk, and any sandbox failure degrades the run to a no-op that emits
//! the literal-normalized input.

pub mod options;
pub use options::*;

pub mod report;
pub use report::*;

use dejs_ast::Ast;
use dejs_errors::Result;
use dejs_passes::{
    CallExtraction, Cleanup, CleanupMode, DependencyResolution, DeobfuscatorState, Evaluation,
    HelperClassification, Pass, PassConfiguration, Rewriting, normalize_reversed_strings,
};

use tracing::{debug, info};

/// The revised source plus the run report.
#[derive(Debug)]
pub struct DeobfuscationOutput {
    pub source: String,
    pub report: DeobfuscationReport,
}

/// The primary entry point of the deobfuscator.
pub struct Deobfuscator {
    options: DeobfuscatorOptions,
}

impl Deobfuscator {
    /// Returns a new deobfuscator for one run.
    pub fn new(options: DeobfuscatorOptions) -> Self {
        Self { options }
    }

    /// Runs the whole pipeline over `source`.
    pub fn deobfuscate(&self, source: &str) -> Result<DeobfuscationOutput> {
        // Literal normalization happens on raw text, before the tree exists.
        let normalized = if self.options.string_reverse {
            normalize_reversed_strings(source).into_owned()
        } else {
            source.to_string()
        };

        // Parse failure is fatal: nothing is rewritten without a full tree.
        let ast = dejs_parser::parse_ast(&normalized)?;
        if self.options.debug {
            debug!(ast = %ast.to_json_string()?, "initial syntax tree");
        }

        if !self.options.function_calls {
            info!("helper call processing is disabled; emitting normalized source");
            return Ok(DeobfuscationOutput {
                source: normalized,
                report: DeobfuscationReport::default(),
            });
        }

        let config = PassConfiguration::new(
            &self.options.intercept_pattern,
            self.options.function_name_filter.as_deref(),
            self.options.min_args,
            self.options.max_args,
            self.options.timeout,
            self.options.trace_lines,
        )?;
        let mut state = DeobfuscatorState::new(ast, config);
        let mut report = DeobfuscationReport::default();

        HelperClassification::do_pass((), &mut state)?;
        report.helpers_found = state.helpers.len();

        CallExtraction::do_pass((), &mut state)?;
        report.calls_extracted = state.pure_calls.len();

        DependencyResolution::do_pass((), &mut state)?;
        report.helpers_extracted = state.extracted.names.len();

        report.call_log = Evaluation::do_pass((), &mut state)?;
        report.calls_evaluated = state.results.len();

        if let Some(path) = &self.options.debug_output_path {
            report.write_trace(path, &state.pure_calls)?;
        }

        // With nothing to substitute the run is a no-op: the normalized
        // input is emitted byte for byte, never a reprinted tree.
        if state.results.is_empty() || self.options.disable_replace {
            info!(
                helpers = report.helpers_found,
                calls = report.calls_extracted,
                "no substitutions; emitting normalized source"
            );
            return Ok(DeobfuscationOutput { source: normalized, report });
        }

        Rewriting::do_pass((), &mut state)?;
        report.calls_rewritten = state.rewritten.values().sum();

        if self.options.cleanup_mode != CleanupMode::None {
            let cleaned = Cleanup::do_pass(self.options.cleanup_mode, &mut state)?;
            report.helpers_cleaned = cleaned.dead_helpers;
            report.initializers_cleaned = cleaned.dead_initializers;
        }

        let source = print_program(&state.ast);
        info!(
            rewritten = report.calls_rewritten,
            cleaned = report.helpers_cleaned.len(),
            "deobfuscation finished"
        );
        Ok(DeobfuscationOutput { source, report })
    }

    /// The options of this run.
    pub fn options(&self) -> &DeobfuscatorOptions {
        &self.options
    }
}

/// Prints the revised tree as the output program text.
fn print_program(ast: &Ast) -> String {
    ast.to_string()
}
