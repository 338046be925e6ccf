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

//! The sandboxed evaluator the harness drives.
//!
//! The evaluator parses the assembled program with the same parser the
//! pipeline uses, then interprets it under a wall-clock timeout, a step
//! budget and a recursion-depth cap. It provides no ambient authority: the
//! sandboxed program can compute and call the recording hooks, nothing else.
//! Every evaluation gets a fresh context; nothing survives between runs.

pub mod builtins;

pub mod context;
pub use context::*;

pub mod interpreter;
pub use interpreter::*;

pub mod scope;
pub use scope::*;

pub mod value;
pub use value::*;

use tracing::debug;

/// How an evaluation ended, as seen by the harness.
#[derive(Debug)]
pub enum EvaluationOutcome {
    /// The program ran to completion; the context holds whatever the
    /// recording hooks captured.
    Ok(SandboxContext),
    /// The wall-clock or step budget ran out.
    Timeout,
    /// The assembled program failed to parse, threw at the top level, or
    /// exhausted the recursion cap.
    Fatal(String),
}

/// The black-box evaluator: one call, three outcomes, no retries.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    pub limits: Limits,
}

impl Evaluator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Runs `program_text` in a fresh sandbox.
    pub fn evaluate(&self, program_text: &str) -> EvaluationOutcome {
        let ast = match dejs_parser::parse_ast(program_text) {
            Ok(ast) => ast,
            Err(error) => return EvaluationOutcome::Fatal(format!("assembled program failed to parse: {error}")),
        };

        let mut interpreter = Interpreter::new(self.limits.clone());
        match interpreter.run(ast.as_repr()) {
            Ok(()) => {
                let context = interpreter.into_context();
                debug!(
                    results = context.results.len(),
                    calls = context.call_log.len(),
                    "sandbox evaluation finished"
                );
                EvaluationOutcome::Ok(context)
            }
            Err(EvalError::Abort(
                error @ (dejs_errors::InterpreterError::Timeout { .. }
                | dejs_errors::InterpreterError::StepLimitExceeded { .. }),
            )) => {
                debug!(%error, "sandbox evaluation timed out");
                EvaluationOutcome::Timeout
            }
            Err(EvalError::Thrown(value)) => EvaluationOutcome::Fatal(
                dejs_errors::InterpreterError::Thrown { message: builtins::error_message(&value) }
                    .to_string(),
            ),
            Err(EvalError::Abort(error)) => EvaluationOutcome::Fatal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn eval_ok(source: &str) -> SandboxContext {
        match Evaluator::default().evaluate(source) {
            EvaluationOutcome::Ok(context) => context,
            other => panic!("expected Ok outcome, got {other:?}"),
        }
    }

    /// Runs a snippet that records a single result under the key `"k"`.
    fn eval_result_of(expression_source: &str) -> CapturedValue {
        let program = format!("__dejs_record(\"k\", {expression_source}, 0);");
        let context = eval_ok(&program);
        context.results.get("k").cloned().unwrap_or(CapturedValue::Unrepresentable)
    }

    #[test]
    fn arithmetic_and_strings() {
        assert_eq!(eval_result_of("1 + 2 * 3"), CapturedValue::Integer(7));
        assert_eq!(eval_result_of("\"a\" + 1"), CapturedValue::String("a1".into()));
        assert_eq!(eval_result_of("10 / 4"), CapturedValue::Fractional(2.5));
        assert_eq!(eval_result_of("\"5\" * \"4\""), CapturedValue::Integer(20));
    }

    #[test]
    fn functions_hoist_and_close_over_scope() {
        let context = eval_ok(
            "var base = 10;\n\
             __dejs_record(\"k\", add(4), 0);\n\
             function add(x) { return base + x; }\n",
        );
        assert_eq!(context.results.get("k"), Some(&CapturedValue::Integer(14)));
    }

    #[test]
    fn string_method_chains() {
        assert_eq!(
            eval_result_of("\"dlrow olleh\".split(\"\").reverse().join(\"\")"),
            CapturedValue::String("hello world".into())
        );
        assert_eq!(eval_result_of("\"abc\".charCodeAt(1)"), CapturedValue::Integer(98));
        assert_eq!(eval_result_of("String.fromCharCode(104, 105)"), CapturedValue::String("hi".into()));
    }

    #[test]
    fn control_flow_loops_and_switch() {
        assert_eq!(
            eval_result_of(
                "(function () { var n = 0; for (var i = 0; i < 5; i++) { n += i; } return n; })()"
            ),
            CapturedValue::Integer(10)
        );
        assert_eq!(
            eval_result_of(
                "(function (x) { switch (x) { case 1: return \"one\"; default: return \"many\"; } })(1)"
            ),
            CapturedValue::String("one".into())
        );
    }

    #[test]
    fn thrown_values_are_catchable() {
        let context = eval_ok(
            "try { undefinedFunction(); __dejs_record(\"no\", 1, 0); }\n\
             catch (e) { __dejs_record(\"caught\", String(e), 0); }\n",
        );
        assert!(context.results.contains_key("caught"));
        assert!(!context.results.contains_key("no"));
    }

    #[test]
    fn unrepresentable_results_are_logged_but_not_mapped() {
        let context = eval_ok("__dejs_record(\"k\", [1, 2], 0);");
        assert!(context.results.is_empty());
        assert_eq!(context.call_log.len(), 1);
    }

    #[test]
    fn infinite_loop_times_out() {
        let evaluator = Evaluator::new(Limits {
            timeout: Duration::from_millis(50),
            step_limit: u64::MAX,
            depth_limit: 128,
        });
        assert!(matches!(evaluator.evaluate("while (true) {}"), EvaluationOutcome::Timeout));
    }

    #[test]
    fn runaway_recursion_fails_the_run() {
        let evaluator = Evaluator::default();
        let outcome = evaluator.evaluate("function f() { return f(); } f();");
        assert!(matches!(outcome, EvaluationOutcome::Fatal(_)));
    }

    #[test]
    fn top_level_throw_is_fatal() {
        assert!(matches!(
            Evaluator::default().evaluate("throw \"boom\";"),
            EvaluationOutcome::Fatal(_)
        ));
    }

    #[test]
    fn error_constructors_stamp_their_own_names() {
        let context = eval_ok(
            "try { throw new TypeError(\"bad input\"); }\n\
             catch (e) { __dejs_record(\"name\", e.name, 0); __dejs_record(\"message\", e.message, 0); }\n\
             try { throw new RangeError(\"out of range\"); }\n\
             catch (e) { __dejs_record(\"range\", e.name, 0); }\n",
        );
        assert_eq!(context.results.get("name"), Some(&CapturedValue::String("TypeError".into())));
        assert_eq!(context.results.get("message"), Some(&CapturedValue::String("bad input".into())));
        assert_eq!(context.results.get("range"), Some(&CapturedValue::String("RangeError".into())));
    }

    #[test]
    fn fatal_diagnostics_keep_the_constructor_name() {
        let outcome = Evaluator::default().evaluate("throw new TypeError(\"bad input\");");
        match outcome {
            EvaluationOutcome::Fatal(reason) => {
                assert!(reason.contains("TypeError: bad input"), "wrong label in: {reason}");
            }
            other => panic!("expected Fatal outcome, got {other:?}"),
        }
    }

    #[test]
    fn require_is_opaque_and_console_discards() {
        let context = eval_ok(
            "console.log(\"ignored\");\n\
             __dejs_record(\"k\", require(\"fs\"), 0);\n",
        );
        assert_eq!(context.results.get("k"), Some(&CapturedValue::String("fs".into())));
    }

    #[test]
    fn iife_runs_at_load_time() {
        let context = eval_ok(
            "var flag = 0;\n\
             (function () { flag = 41; })();\n\
             __dejs_record(\"k\", flag + 1, 0);\n",
        );
        assert_eq!(context.results.get("k"), Some(&CapturedValue::Integer(42)));
    }

    #[test]
    fn apply_and_arguments_object() {
        assert_eq!(
            eval_result_of("(function () { return arguments.length; }).apply(null, [1, 2, 3])"),
            CapturedValue::Integer(3)
        );
    }
}
