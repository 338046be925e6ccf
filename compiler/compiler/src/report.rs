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

use dejs_errors::{CliError, Result};
use dejs_interpreter::{CallRecord, CapturedValue};
use dejs_passes::PureCall;

use serde::Serialize;
use std::path::Path;

/// What one run did, for callers that want numbers instead of logs.
#[derive(Debug, Default)]
pub struct DeobfuscationReport {
    /// Helpers matching the intercept pattern with a definition in the tree.
    pub helpers_found: usize,
    /// Pure constant-argument call sites.
    pub calls_extracted: usize,
    /// Helpers shipped to the evaluator.
    pub helpers_extracted: usize,
    /// Call sites with a recorded result.
    pub calls_evaluated: usize,
    /// Call sites replaced by literals.
    pub calls_rewritten: usize,
    /// Helper definitions commented or removed by cleanup.
    pub helpers_cleaned: Vec<String>,
    /// Initializer blocks commented or removed by cleanup.
    pub initializers_cleaned: usize,
    /// The sandbox call log.
    pub call_log: Vec<CallRecord>,
}

/// The side-channel JSON trace written to `debug_output_path`.
#[derive(Serialize)]
struct Trace<'a> {
    timestamp: String,
    #[serde(rename = "callLog")]
    call_log: Vec<TraceEntry<'a>>,
    summary: TraceSummary,
}

#[derive(Serialize)]
struct TraceEntry<'a> {
    call: &'a str,
    args: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a CapturedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(rename = "elapsedMs")]
    elapsed_ms: f64,
}

#[derive(Serialize)]
struct TraceSummary {
    #[serde(rename = "totalCalls")]
    total_calls: usize,
    #[serde(rename = "successfulCalls")]
    successful_calls: usize,
    #[serde(rename = "failedCalls")]
    failed_calls: usize,
}

impl DeobfuscationReport {
    /// Writes the JSON call trace for this run.
    pub fn write_trace(&self, path: &Path, pure_calls: &[PureCall]) -> Result<()> {
        let entries: Vec<TraceEntry<'_>> = self
            .call_log
            .iter()
            .map(|record| {
                let args = pure_calls
                    .iter()
                    .find(|call| call.key == record.call)
                    .map(|call| call.arguments.iter().map(String::as_str).collect())
                    .unwrap_or_default();
                TraceEntry {
                    call: &record.call,
                    args,
                    result: record.result.as_ref(),
                    error: record.error.as_deref(),
                    elapsed_ms: record.elapsed_ms,
                }
            })
            .collect();

        let failed = entries.iter().filter(|entry| entry.error.is_some()).count();
        let trace = Trace {
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: TraceSummary {
                total_calls: entries.len(),
                successful_calls: entries.len() - failed,
                failed_calls: failed,
            },
            call_log: entries,
        };

        let json = serde_json::to_string_pretty(&trace)
            .map_err(|error| CliError::TraceWrite { path: path.to_path_buf(), error: std::io::Error::other(error) })?;
        std::fs::write(path, json)
            .map_err(|error| CliError::TraceWrite { path: path.to_path_buf(), error }.into())
    }
}
