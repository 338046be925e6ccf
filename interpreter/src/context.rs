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

use crate::value::{Value, format_number};

use indexmap::IndexMap;
use serde::Serialize;

/// A captured evaluation result of a representable kind.
///
/// Helper return values that have no literal form in the subset (objects,
/// arrays, functions, `NaN`, infinities) are unrepresentable; their calls
/// are omitted from the result map rather than errored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CapturedValue {
    String(String),
    Integer(i64),
    Fractional(f64),
    Boolean(bool),
    Null,
    Undefined,
    Unrepresentable,
}

impl CapturedValue {
    /// Captures a runtime value, if it is of a representable kind.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Str(s) => CapturedValue::String(s.as_ref().clone()),
            Value::Bool(b) => CapturedValue::Boolean(*b),
            Value::Null => CapturedValue::Null,
            Value::Undefined => CapturedValue::Undefined,
            Value::Number(n) => {
                if !n.is_finite() {
                    CapturedValue::Unrepresentable
                } else if *n == n.trunc() && n.abs() < 9007199254740992.0 {
                    CapturedValue::Integer(*n as i64)
                } else {
                    CapturedValue::Fractional(*n)
                }
            }
            _ => CapturedValue::Unrepresentable,
        }
    }

    /// A short description for logs and traces.
    pub fn describe(&self) -> String {
        match self {
            CapturedValue::String(s) => format!("{s:?}"),
            CapturedValue::Integer(n) => n.to_string(),
            CapturedValue::Fractional(n) => format_number(*n),
            CapturedValue::Boolean(b) => b.to_string(),
            CapturedValue::Null => "null".to_string(),
            CapturedValue::Undefined => "undefined".to_string(),
            CapturedValue::Unrepresentable => "<unrepresentable>".to_string(),
        }
    }
}

/// One line of the call-trace log.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    /// The printed call expression.
    pub call: String,
    /// The captured result, absent when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CapturedValue>,
    /// The error message, absent when the call succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time the call took inside the sandbox.
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: f64,
}

/// The state the sandboxed program mutates through the recording hooks: the
/// result map keyed by printed call expression, and the call-trace log.
#[derive(Debug, Default)]
pub struct SandboxContext {
    pub results: IndexMap<String, CapturedValue>,
    pub call_log: Vec<CallRecord>,
}

impl SandboxContext {
    /// Records a successful call. Unrepresentable results are logged but
    /// excluded from the result map.
    pub fn record_result(&mut self, key: String, value: CapturedValue, elapsed_ms: f64) {
        if value != CapturedValue::Unrepresentable {
            self.results.insert(key.clone(), value.clone());
        }
        self.call_log.push(CallRecord { call: key, result: Some(value), error: None, elapsed_ms });
    }

    /// Records a failed call. The key never enters the result map.
    pub fn record_error(&mut self, key: String, error: String, elapsed_ms: f64) {
        self.call_log.push(CallRecord { call: key, result: None, error: Some(error), elapsed_ms });
    }
}
