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

//! The evaluation harness.
//!
//! Assembles a self-contained program (preamble, context body, driver)
//! and makes the pipeline's single synchronous call into the sandbox. The
//! preamble wraps every driver call so one failing helper only loses its own
//! entry; the context body carries the initializer blocks that could mutate
//! helper behavior, then every extracted helper definition in dependency
//! order. Sandbox failure of any kind empties the result map and the run
//! degrades to a no-op rewrite.

use crate::{DeobfuscatorState, Pass, common::is_initializer_statement};

use dejs_ast::{CallExpression, Statement, Visitor, quote_string};
use dejs_errors::Result;
use dejs_interpreter::{CallRecord, EvaluationOutcome, Evaluator};

use indexmap::IndexSet;
use std::fmt::Write as _;
use tracing::{debug, trace, warn};

/// The wrapper the driver section calls for each pure call site. The thunk
/// form keeps the wrapper independent of `Function.prototype.apply`.
const PREAMBLE: &str = "\
function safeCall(key, thunk) {
    var started = Date.now();
    try {
        __dejs_record(key, thunk(), Date.now() - started);
    } catch (error) {
        var message = error && error.message ? error.message : String(error);
        __dejs_record_error(key, message, Date.now() - started);
    }
}
";

/// The evaluation pass. Returns the call-trace log for reporting.
pub struct Evaluation;

impl Pass for Evaluation {
    type Input = ();
    type Output = Vec<CallRecord>;

    const NAME: &str = "Evaluation";

    fn do_pass(_input: (), state: &mut DeobfuscatorState) -> Result<Vec<CallRecord>> {
        if state.pure_calls.is_empty() {
            debug!("no pure call sites; skipping the sandbox");
            return Ok(Vec::new());
        }

        let program = assemble_program(state);
        let evaluator = Evaluator::new(state.config.limits());
        match evaluator.evaluate(&program) {
            EvaluationOutcome::Ok(context) => {
                let keys: IndexSet<&str> = state.pure_calls.iter().map(|call| call.key.as_str()).collect();
                // Every result key must name a pure call site; the hooks
                // only ever see driver keys, so this is belt over braces.
                state.results = context
                    .results
                    .into_iter()
                    .filter(|(key, _)| keys.contains(key.as_str()))
                    .collect();
                debug!(results = state.results.len(), "sandbox evaluation succeeded");
                Ok(context.call_log)
            }
            EvaluationOutcome::Timeout => {
                warn!("sandbox evaluation timed out; continuing without rewrites");
                Ok(Vec::new())
            }
            EvaluationOutcome::Fatal(reason) => {
                warn!(%reason, "sandbox evaluation failed; continuing without rewrites");
                Ok(Vec::new())
            }
        }
    }
}

/// Builds the evaluator program: preamble, context body, driver.
fn assemble_program(state: &DeobfuscatorState) -> String {
    let mut program = String::from(PREAMBLE);

    // Context body: initializer blocks that touch extracted helpers, verbatim.
    let extracted: IndexSet<&str> = state.extracted.names.iter().map(String::as_str).collect();
    for statement in &state.ast.as_repr().statements {
        if is_initializer_statement(statement) && references_any(statement, &extracted) {
            let _ = writeln!(program, "{statement}");
        }
    }

    // Context body: every extracted helper, dependencies first.
    for name in &state.extracted.names {
        if let Some(definition) = state.helpers.get(name) {
            let _ = writeln!(program, "{}", definition.statement);
        }
    }

    // Driver: one wrapped call per pure call site.
    for call in &state.pure_calls {
        let line = format!("safeCall({}, function () {{ return {}; }});", quote_string(&call.key), call.key);
        if state.config.trace_lines {
            trace!(%line, "driver line");
        }
        let _ = writeln!(program, "{line}");
    }

    program
}

/// Does `statement` reference any of `names`, either as a plain identifier
/// or as a member-call property?
fn references_any(statement: &Statement, names: &IndexSet<&str>) -> bool {
    let mut finder = ReferenceFinder { names, found: false };
    finder.visit_statement(statement);
    finder.found
}

struct ReferenceFinder<'a> {
    names: &'a IndexSet<&'a str>,
    found: bool,
}

impl<'a> Visitor<'a> for ReferenceFinder<'_> {
    fn visit_identifier(&mut self, input: &'a dejs_ast::Identifier) {
        if self.names.contains(input.name.as_str()) {
            self.found = true;
        }
    }

    fn visit_call(&mut self, input: &'a CallExpression) {
        if let Some(name) = crate::common::resolve_callee_name(input)
            && self.names.contains(name)
        {
            self.found = true;
        }
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CallExtraction, DependencyResolution, HelperClassification, PassConfiguration, ResultMap,
    };
    use dejs_interpreter::CapturedValue;
    use std::time::Duration;

    fn run_pipeline(source: &str, min_args: usize, max_args: usize) -> (ResultMap, DeobfuscatorState) {
        let config =
            PassConfiguration::new(r"^f\d+$", None, min_args, max_args, Duration::from_secs(5), false)
                .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        CallExtraction::do_pass((), &mut state).expect("extraction cannot fail");
        DependencyResolution::do_pass((), &mut state).expect("resolution cannot fail");
        Evaluation::do_pass((), &mut state).expect("evaluation never fails the run");
        (state.results.clone(), state)
    }

    #[test]
    fn evaluates_constant_arithmetic() {
        let (results, _) = run_pipeline(
            "function f123(a, b, c, d) { return a + b + c + d; }\nvar x = f123(1, 2, 3, 4);\n",
            4,
            6,
        );
        assert_eq!(results.get("f123(1, 2, 3, 4)"), Some(&CapturedValue::Integer(10)));
    }

    #[test]
    fn initializer_setup_feeds_dependent_helpers() {
        let (results, _) = run_pipeline(
            "function f1(x) { return seed + x; }\n\
             function f2(x) { return f1(x) + 1; }\n\
             (function () { seed = 10; f2(3); })();\n\
             var y = f2(10);\n",
            1,
            6,
        );
        // The immediately-invoked block ships with the program, so the
        // setup it performs is visible to the helpers.
        assert_eq!(results.get("f2(10)"), Some(&CapturedValue::Integer(21)));
        // The initializer call itself is not a result key.
        assert!(!results.contains_key("f2(3)"));
    }

    #[test]
    fn per_call_failures_only_lose_their_own_entry() {
        let (results, _) = run_pipeline(
            "function f1(x) { if (x > 1) { throw new Error(\"nope\"); } return x; }\n\
             var a = f1(1);\nvar b = f1(2);\n",
            1,
            6,
        );
        assert_eq!(results.get("f1(1)"), Some(&CapturedValue::Integer(1)));
        assert!(!results.contains_key("f1(2)"));
    }

    #[test]
    fn sandbox_timeout_empties_the_result_map() {
        let source = "function f1(x) { while (true) {} }\nvar a = f1(1);\n";
        let config =
            PassConfiguration::new(r"^f\d+$", None, 1, 6, Duration::from_millis(50), false)
                .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        CallExtraction::do_pass((), &mut state).expect("extraction cannot fail");
        DependencyResolution::do_pass((), &mut state).expect("resolution cannot fail");
        let log = Evaluation::do_pass((), &mut state).expect("evaluation never fails the run");
        assert!(state.results.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn string_helpers_round_through_the_sandbox() {
        let (results, _) = run_pipeline(
            "function f7(s) { return s.split(\"\").reverse().join(\"\"); }\nvar x = f7(\"abc\");\n",
            1,
            6,
        );
        assert_eq!(results.get("f7(\"abc\")"), Some(&CapturedValue::String("cba".into())));
    }
}
