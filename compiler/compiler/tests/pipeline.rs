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

//! End-to-end pipeline behavior over small programs.

use dejs_compiler::{Deobfuscator, DeobfuscatorOptions};
use dejs_passes::CleanupMode;

use std::time::Duration;

fn options() -> DeobfuscatorOptions {
    DeobfuscatorOptions {
        intercept_pattern: r"^f\d+$".to_string(),
        min_args: 4,
        max_args: 6,
        timeout: Duration::from_secs(5),
        ..DeobfuscatorOptions::default()
    }
}

fn run(source: &str, options: DeobfuscatorOptions) -> String {
    Deobfuscator::new(options)
        .deobfuscate(source)
        .expect("the pipeline should not fail on valid source")
        .source
}

#[test]
fn constant_arithmetic_is_folded() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n";
    let output = run(source, options());
    assert!(output.contains("var x = 10;"), "missing folded literal in:\n{output}");
    assert!(output.contains("function f123"), "helper should stay under cleanup `none`:\n{output}");
}

#[test]
fn constant_arithmetic_with_cleanup_removes_the_helper() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n";
    let output = run(source, DeobfuscatorOptions { cleanup_mode: CleanupMode::Remove, ..options() });
    assert!(output.contains("var x = 10;"));
    assert!(!output.contains("function f123"), "helper should be deleted:\n{output}");
}

#[test]
fn dependency_through_initializer_is_preserved() {
    let source = "function f1(x){return x*2;}\n\
                  function f2(x){return f1(x)+1;}\n\
                  (function(){ f2(3); })();\n\
                  var y = f2(10);\n";
    let output = run(source, DeobfuscatorOptions { min_args: 1, max_args: 6, ..options() });
    assert!(output.contains("var y = 21;"), "dependent call not folded:\n{output}");
    assert!(output.contains("f2(3)"), "initializer call must stay:\n{output}");
}

#[test]
fn reversed_string_idiom_folds_without_helpers() {
    let source = "var s = \"dlrow olleh\".split(\"\").reverse().join(\"\");\n";
    let output = run(source, options());
    assert_eq!(output, "var s = \"hello world\";\n");
}

#[test]
fn reserved_word_property_calls_are_untouched() {
    let source = "obj.default(1,2,3,4);\n";
    let output = run(source, options());
    assert_eq!(output, source);
}

#[test]
fn sandbox_timeout_degrades_to_a_no_op() {
    let source = "function f1(a,b,c,d){ while(true){} }\nvar x = f1(1,2,3,4);\n";
    let output = run(
        source,
        DeobfuscatorOptions { timeout: Duration::from_millis(50), ..options() },
    );
    assert_eq!(output, source);
}

#[test]
fn non_literal_arguments_leave_call_and_helper_alone() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar r = f123(1,2,3,k);\n";
    let output = run(source, DeobfuscatorOptions { cleanup_mode: CleanupMode::Remove, ..options() });
    assert_eq!(output, source, "nothing is pure, so the run is a no-op");
}

#[test]
fn mixed_pure_and_impure_calls_keep_the_helper() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\n\
                  var x = f123(1,2,3,4);\n\
                  var r = f123(1,2,3,k);\n";
    let output = run(source, DeobfuscatorOptions { cleanup_mode: CleanupMode::Remove, ..options() });
    assert!(output.contains("var x = 10;"));
    assert!(output.contains("f123(1, 2, 3, k)"), "impure call must stay:\n{output}");
    assert!(output.contains("function f123"), "helper with a live use must stay:\n{output}");
}

#[test]
fn disable_replace_evaluates_but_keeps_the_source() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n";
    let result = Deobfuscator::new(DeobfuscatorOptions { disable_replace: true, ..options() })
        .deobfuscate(source)
        .expect("the pipeline should not fail");
    assert_eq!(result.source, source);
    assert_eq!(result.report.calls_evaluated, 1);
    assert_eq!(result.report.calls_rewritten, 0);
}

#[test]
fn string_helpers_fold_to_quoted_literals() {
    let source = "function f77(a,b,c,d){return a+b+c+d;}\nvar s = f77(\"de\", \"ob\", \"fu\", \"scate\");\n";
    let output = run(source, options());
    assert!(output.contains("var s = \"deobfuscate\";"), "missing folded string in:\n{output}");
}

#[test]
fn cleanup_comment_mode_keeps_a_readable_record() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n";
    let output = run(source, DeobfuscatorOptions { cleanup_mode: CleanupMode::Comment, ..options() });
    assert!(output.contains("/* [cleanup] function f123"), "missing cleanup comment in:\n{output}");
    assert!(output.contains("var x = 10;"));
}

#[test]
fn parse_failure_is_fatal() {
    assert!(Deobfuscator::new(options()).deobfuscate("var x = ;").is_err());
}

#[test]
fn rewritten_output_reparses() {
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\nvar y = f123(2,3,4,5);\n";
    let output = run(source, options());
    assert!(dejs_parser::parse_ast(&output).is_ok(), "output must parse:\n{output}");
    assert!(output.contains("var x = 10;"), "first site folds:\n{output}");
    assert!(output.contains("var y = 14;"), "second site folds:\n{output}");
}

#[test]
fn calls_outside_candidate_contexts_are_not_rewritten() {
    // A call standing as a binary operand is not one of the candidate
    // contexts, so it stays even though its arguments are literal.
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4) + 1;\n";
    let output = run(source, options());
    assert_eq!(output, source);
}

#[test]
fn debug_trace_is_written_when_requested() {
    let dir = tempfile::tempdir().expect("a temp dir is available");
    let trace_path = dir.path().join("trace.json");
    let source = "function f123(a,b,c,d){return a+b+c+d;}\nvar x = f123(1,2,3,4);\n";
    let result = Deobfuscator::new(DeobfuscatorOptions {
        debug_output_path: Some(trace_path.clone()),
        ..options()
    })
    .deobfuscate(source)
    .expect("the pipeline should not fail");
    assert!(result.source.contains("var x = 10;"));

    let trace: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&trace_path).expect("the trace exists"))
            .expect("the trace is valid JSON");
    assert_eq!(trace["summary"]["totalCalls"], 1);
    assert_eq!(trace["summary"]["successfulCalls"], 1);
    assert_eq!(trace["callLog"][0]["call"], "f123(1, 2, 3, 4)");
    assert_eq!(trace["callLog"][0]["result"], 10);
}
