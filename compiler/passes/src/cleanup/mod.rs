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

//! Dead-helper cleanup.
//!
//! After rewriting, a helper whose name has no remaining use outside its own
//! definition is dead; an initializer block whose every helper call was
//! rewritten has served its purpose. Depending on the configured mode, dead
//! nodes are left alone, commented out in place, or deleted. Cleanup never
//! introduces identifiers and never reorders statements, so the output stays
//! a subsequence of the rewritten program.

use crate::{
    DeobfuscatorState, Pass, ResultMap,
    common::{is_initializer_statement, resolve_callee_name},
    helper_classification::{HelperKind, HelperSet},
};

use dejs_ast::*;
use dejs_errors::Result;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// What to do with provably dead helpers and initializers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CleanupMode {
    /// Leave everything intact.
    #[default]
    None,
    /// Wrap the printed form in a block comment.
    Comment,
    /// Delete the node.
    Remove,
}

/// What cleanup did, for the run report.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub dead_helpers: Vec<String>,
    pub dead_initializers: usize,
}

/// The cleanup pass.
pub struct Cleanup;

impl Pass for Cleanup {
    type Input = CleanupMode;
    type Output = CleanupReport;

    const NAME: &str = "Cleanup";

    fn do_pass(mode: CleanupMode, state: &mut DeobfuscatorState) -> Result<CleanupReport> {
        if mode == CleanupMode::None || state.rewritten.is_empty() {
            return Ok(CleanupReport::default());
        }

        let dead_helpers = find_dead_helpers(state.ast.as_repr(), &state.helpers);
        let dead_initializers =
            find_dead_initializers(state.ast.as_repr(), &state.helpers, &state.results);

        let program = std::mem::take(&mut state.ast).into_repr();
        let mut cleaner = Cleaner { helpers: &state.helpers, dead: &dead_helpers, mode };
        let statements = program
            .statements
            .into_iter()
            .enumerate()
            .filter_map(|(index, statement)| {
                if dead_initializers.contains(&index) {
                    return match mode {
                        CleanupMode::Remove => None,
                        _ => Some(comment_out(&statement)),
                    };
                }
                cleaner.reconstruct_statement(statement)
            })
            .collect();
        state.ast = Ast::new(Program { statements, span: program.span });

        let report = CleanupReport {
            dead_helpers: dead_helpers.into_iter().collect(),
            dead_initializers: dead_initializers.len(),
        };
        debug!(
            helpers = report.dead_helpers.len(),
            initializers = report.dead_initializers,
            "cleanup finished"
        );
        Ok(report)
    }
}

/// Replaces a statement with a block comment holding its printed form.
fn comment_out(statement: &Statement) -> Statement {
    Statement::Comment(CommentStatement { text: statement.to_string(), span: statement.span() })
}

/// A helper is dead when no reference to it remains outside its own
/// definition. References inside export assignments count, so exported
/// helpers are always retained.
fn find_dead_helpers(program: &Program, helpers: &HelperSet) -> IndexSet<String> {
    let mut counter = ReferenceCounter {
        helpers,
        counts: helpers.keys().map(|name| (name.clone(), 0)).collect(),
        suppressed: None,
    };
    counter.visit_program(program);
    counter
        .counts
        .into_iter()
        .filter(|(_, count)| *count == 0)
        .map(|(name, _)| name)
        .collect()
}

/// Counts the live references to each helper name, ignoring references a
/// definition makes to itself (direct recursion does not keep a helper
/// alive).
struct ReferenceCounter<'a> {
    helpers: &'a HelperSet,
    counts: IndexMap<String, usize>,
    /// The helper whose own definition is being walked.
    suppressed: Option<String>,
}

impl ReferenceCounter<'_> {
    fn record(&mut self, name: &str) {
        if self.suppressed.as_deref() == Some(name) {
            return;
        }
        if let Some(count) = self.counts.get_mut(name) {
            *count += 1;
        }
    }
}

impl<'a> Visitor<'a> for ReferenceCounter<'_> {
    fn visit_identifier(&mut self, input: &'a Identifier) {
        self.record(&input.name);
    }

    fn visit_call(&mut self, input: &'a CallExpression) {
        // A member-property callee references the helper without containing
        // an identifier node for it.
        if matches!(&*input.callee, Expression::Member(_))
            && let Some(name) = resolve_callee_name(input)
        {
            self.record(name);
        }
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }

    fn visit_function(&mut self, input: &'a FunctionDeclaration) {
        if self.helpers.contains_key(&input.name.name) {
            let previous = self.suppressed.replace(input.name.name.clone());
            self.visit_block(&input.body);
            self.suppressed = previous;
        } else {
            self.visit_block(&input.body);
        }
    }

    fn visit_definition(&mut self, input: &'a VariableDeclaration) {
        for declarator in &input.declarators {
            let Some(init) = &declarator.init else { continue };
            let is_helper_binding = self.helpers.contains_key(&declarator.name.name)
                && matches!(init, Expression::Function(_) | Expression::Arrow(_));
            if is_helper_binding {
                let previous = self.suppressed.replace(declarator.name.name.clone());
                self.visit_expression(init);
                self.suppressed = previous;
            } else {
                self.visit_expression(init);
            }
        }
    }
}

/// An initializer block at the top level is dead when it contains at least
/// one helper call and every helper call inside it has a recorded result.
/// Blocks without any helper call are kept: they do unrelated work.
fn find_dead_initializers(
    program: &Program,
    helpers: &HelperSet,
    results: &ResultMap,
) -> IndexSet<usize> {
    program
        .statements
        .iter()
        .enumerate()
        .filter(|(_, statement)| {
            if !is_initializer_statement(statement) {
                return false;
            }
            let mut scan = InitializerScan { helpers, results, helper_calls: 0, unresolved: 0 };
            scan.visit_statement(statement);
            scan.helper_calls > 0 && scan.unresolved == 0
        })
        .map(|(index, _)| index)
        .collect()
}

struct InitializerScan<'a> {
    helpers: &'a HelperSet,
    results: &'a ResultMap,
    helper_calls: usize,
    unresolved: usize,
}

impl<'a> Visitor<'a> for InitializerScan<'_> {
    fn visit_call(&mut self, input: &'a CallExpression) {
        if let Some(name) = resolve_callee_name(input)
            && self.helpers.contains_key(name)
        {
            self.helper_calls += 1;
            if !self.results.contains_key(&input.to_string()) {
                self.unresolved += 1;
            }
        }
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }
}

/// Applies the configured mode to dead helper definitions anywhere in the
/// tree. A binding sharing its declaration with live declarators is kept: a
/// partial comment would not parse.
struct Cleaner<'a> {
    helpers: &'a HelperSet,
    dead: &'a IndexSet<String>,
    mode: CleanupMode,
}

impl Reconstructor for Cleaner<'_> {
    fn reconstruct_function(&mut self, input: FunctionDeclaration) -> Option<Statement> {
        if self.dead.contains(&input.name.name) {
            let statement = Statement::Function(input);
            return match self.mode {
                CleanupMode::Remove => None,
                _ => Some(comment_out(&statement)),
            };
        }
        Some(Statement::Function(FunctionDeclaration {
            name: input.name,
            params: input.params,
            body: self.reconstruct_block(input.body),
            span: input.span,
        }))
    }

    fn reconstruct_definition(&mut self, input: VariableDeclaration) -> Option<Statement> {
        let all_dead = input.declarators.iter().all(|declarator| {
            self.dead.contains(&declarator.name.name)
                && self
                    .helpers
                    .get(&declarator.name.name)
                    .is_some_and(|helper| helper.kind == HelperKind::Binding)
        });
        if all_dead && !input.declarators.is_empty() {
            let statement = Statement::Definition(input);
            return match self.mode {
                CleanupMode::Remove => None,
                _ => Some(comment_out(&statement)),
            };
        }
        Some(Statement::Definition(VariableDeclaration {
            kind: input.kind,
            declarators: input
                .declarators
                .into_iter()
                .map(|declarator| VariableDeclarator {
                    name: declarator.name,
                    init: declarator.init.map(|init| self.reconstruct_expression(init)),
                    span: declarator.span,
                })
                .collect(),
            span: input.span,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CallExtraction, DependencyResolution, Evaluation, HelperClassification, PassConfiguration,
        Rewriting,
    };
    use std::time::Duration;

    fn cleaned(source: &str, mode: CleanupMode) -> String {
        let config =
            PassConfiguration::new(r"^f\d+$", None, 1, 6, Duration::from_secs(5), false)
                .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        CallExtraction::do_pass((), &mut state).expect("extraction cannot fail");
        DependencyResolution::do_pass((), &mut state).expect("resolution cannot fail");
        Evaluation::do_pass((), &mut state).expect("evaluation never fails the run");
        Rewriting::do_pass((), &mut state).expect("rewriting cannot fail");
        Cleanup::do_pass(mode, &mut state).expect("cleanup cannot fail");
        state.ast.to_string()
    }

    const SOURCE: &str = "function f123(a, b, c, d) { return a + b + c + d; }\nvar x = f123(1, 2, 3, 4);\n";

    #[test]
    fn remove_deletes_dead_helpers() {
        let output = cleaned(SOURCE, CleanupMode::Remove);
        assert_eq!(output, "var x = 10;\n");
    }

    #[test]
    fn comment_preserves_the_printed_form() {
        let output = cleaned(SOURCE, CleanupMode::Comment);
        assert!(output.starts_with("/* [cleanup] function f123(a, b, c, d) {"));
        assert!(output.contains("var x = 10;"));
    }

    #[test]
    fn none_leaves_the_definition() {
        let output = cleaned(SOURCE, CleanupMode::None);
        assert!(output.contains("function f123"));
        assert!(output.contains("var x = 10;"));
    }

    #[test]
    fn helpers_with_remaining_uses_survive() {
        let source = "function f123(a, b, c, d) { return a + b + c + d; }\n\
                      var x = f123(1, 2, 3, 4);\n\
                      var r = f123(1, 2, 3, k);\n";
        let output = cleaned(source, CleanupMode::Remove);
        assert!(output.contains("function f123"));
        assert!(output.contains("var x = 10;"));
        assert!(output.contains("f123(1, 2, 3, k)"));
    }

    #[test]
    fn initializers_with_unrewritten_calls_survive() {
        let source = "function f1(x) { return x + 1; }\n\
                      (function () { f1(3); })();\n\
                      var y = f1(10);\n";
        let output = cleaned(source, CleanupMode::Remove);
        // `f1(3)` was never rewritten, so the block and the helper stay.
        assert!(output.contains("f1(3)"));
        assert!(output.contains("function f1"));
        assert!(output.contains("var y = 11;"));
    }

    #[test]
    fn exported_helpers_survive() {
        let source = "function f123(a, b, c, d) { return a; }\n\
                      var x = f123(1, 2, 3, 4);\n\
                      module.exports = { helper: f123 };\n";
        let output = cleaned(source, CleanupMode::Remove);
        assert!(output.contains("function f123"));
    }
}
