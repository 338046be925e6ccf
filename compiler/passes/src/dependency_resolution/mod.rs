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

//! Dependency resolution.
//!
//! The evaluator program must be self-contained, so every helper reachable
//! from a seed ships with it. Seeds are the helper calls inside initializer
//! contexts (setup an immediately-invoked block performs is an implicit
//! dependency) plus the callees of the pure call set and of window-rejected
//! calls. The closure follows the call graph between helper bodies to a
//! fixed point; cycles are tolerated and reported, not fatal, because the
//! target language resolves forward references within one program unit.

use crate::{
    DeobfuscatorState, Pass,
    common::{DiGraph, is_immediate_call, resolve_callee_name},
    helper_classification::HelperSet,
};

use dejs_ast::*;
use dejs_errors::Result;

use indexmap::IndexSet;
use tracing::{debug, warn};

/// The helpers whose definitions ship to the evaluator, dependencies first
/// where the call graph allows.
#[derive(Debug, Default)]
pub struct ExtractedSet {
    pub names: Vec<String>,
    /// Whether the extracted helpers contain a genuine call cycle.
    pub cyclic: bool,
}

/// The resolution pass.
pub struct DependencyResolution;

impl Pass for DependencyResolution {
    type Input = ();
    type Output = ();

    const NAME: &str = "DependencyResolution";

    fn do_pass(_input: (), state: &mut DeobfuscatorState) -> Result<()> {
        // Seed set: initializer-context helper calls…
        let mut seeds = collect_initializer_seeds(state.ast.as_repr(), &state.helpers);
        // …plus the callees of P and of window-rejected calls.
        seeds.extend(state.pure_calls.iter().map(|call| call.callee.clone()));
        seeds.extend(state.window_rejected.iter().cloned());

        let graph = build_call_graph(&state.helpers);
        let names = graph.post_order(seeds);

        // Restrict the cycle check to what actually ships. Self-edges are
        // absorbed silently: direct recursion is not a dependency cycle.
        let mut shipped = DiGraph::new(names.iter().cloned().collect());
        for name in &names {
            for callee in graph.successors(name) {
                if callee != name && names.contains(callee) {
                    shipped.add_edge(name.clone(), callee.clone());
                }
            }
        }
        let cyclic = shipped.contains_cycle();
        if cyclic {
            warn!("the extracted helpers call each other in a cycle; emitting an arbitrary order");
        }

        debug!(extracted = names.len(), cyclic, "dependency resolution finished");
        state.extracted = ExtractedSet { names, cyclic };
        Ok(())
    }
}

/// Builds the call graph over helper bodies: an edge `a → b` exists iff the
/// body of `a` contains a call whose callee resolves to the helper `b`.
fn build_call_graph(helpers: &HelperSet) -> DiGraph<String> {
    let mut graph = DiGraph::new(helpers.keys().cloned().collect());
    for (name, definition) in helpers {
        let mut finder = HelperCallFinder { helpers, found: IndexSet::new() };
        finder.visit_statement(&definition.statement);
        for callee in finder.found {
            graph.add_edge(name.clone(), callee);
        }
    }
    graph
}

/// Collects helper calls that lie inside initializer contexts anywhere in
/// the program.
fn collect_initializer_seeds(program: &Program, helpers: &HelperSet) -> IndexSet<String> {
    let mut collector = SeedCollector { helpers, initializer_depth: 0, seeds: IndexSet::new() };
    collector.visit_program(program);
    collector.seeds
}

struct HelperCallFinder<'a> {
    helpers: &'a HelperSet,
    found: IndexSet<String>,
}

impl<'a> Visitor<'a> for HelperCallFinder<'_> {
    fn visit_call(&mut self, input: &'a CallExpression) {
        if let Some(name) = resolve_callee_name(input)
            && self.helpers.contains_key(name)
        {
            self.found.insert(name.to_string());
        }
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }
}

struct SeedCollector<'a> {
    helpers: &'a HelperSet,
    initializer_depth: usize,
    seeds: IndexSet<String>,
}

impl<'a> Visitor<'a> for SeedCollector<'_> {
    fn visit_call(&mut self, input: &'a CallExpression) {
        let entered = is_immediate_call(input);
        if entered {
            self.initializer_depth += 1;
        }
        if self.initializer_depth > 0
            && let Some(name) = resolve_callee_name(input)
            && self.helpers.contains_key(name)
        {
            self.seeds.insert(name.to_string());
        }
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
        if entered {
            self.initializer_depth -= 1;
        }
    }

    fn visit_do_while(&mut self, input: &'a DoWhileStatement) {
        self.initializer_depth += 1;
        self.visit_statement(&input.body);
        self.visit_expression(&input.condition);
        self.initializer_depth -= 1;
    }

    fn visit_while(&mut self, input: &'a WhileStatement) {
        self.initializer_depth += 1;
        self.visit_expression(&input.condition);
        self.visit_statement(&input.body);
        self.initializer_depth -= 1;
    }

    fn visit_try(&mut self, input: &'a TryStatement) {
        self.initializer_depth += 1;
        self.visit_block(&input.block);
        if let Some(handler) = &input.handler {
            self.visit_block(&handler.body);
        }
        if let Some(finalizer) = &input.finalizer {
            self.visit_block(finalizer);
        }
        self.initializer_depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CallExtraction, HelperClassification, PassConfiguration};
    use std::time::Duration;

    fn resolve(source: &str) -> ExtractedSet {
        let config =
            PassConfiguration::new(r"^f\d+$", None, 1, 6, Duration::from_secs(5), false)
                .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        CallExtraction::do_pass((), &mut state).expect("extraction cannot fail");
        DependencyResolution::do_pass((), &mut state).expect("resolution cannot fail");
        state.extracted
    }

    #[test]
    fn transitive_closure_through_initializer() {
        let extracted = resolve(
            "function f1(x) { return x * 2; }\n\
             function f2(x) { return f1(x) + 1; }\n\
             (function () { f2(3); })();\n\
             var y = f2(10);\n",
        );
        assert!(extracted.names.contains(&"f1".to_string()));
        assert!(extracted.names.contains(&"f2".to_string()));
        assert!(!extracted.cyclic);
        // Dependencies come first.
        let f1 = extracted.names.iter().position(|n| n == "f1");
        let f2 = extracted.names.iter().position(|n| n == "f2");
        assert!(f1 < f2);
    }

    #[test]
    fn unreferenced_helpers_are_not_extracted() {
        let extracted = resolve(
            "function f1(x) { return x; }\n\
             function f2(x) { return x; }\n\
             var y = f1(1);\n",
        );
        assert_eq!(extracted.names, vec!["f1".to_string()]);
    }

    #[test]
    fn cycles_are_reported_but_not_fatal() {
        let extracted = resolve(
            "function f1(x) { return x < 1 ? x : f2(x - 1); }\n\
             function f2(x) { return f1(x); }\n\
             var y = f1(3);\n",
        );
        assert_eq!(extracted.names.len(), 2);
        assert!(extracted.cyclic);
    }

    #[test]
    fn self_recursion_is_absorbed_silently() {
        let extracted = resolve(
            "function f1(x) { return x < 1 ? 0 : f1(x - 1); }\n\
             var y = f1(3);\n",
        );
        assert_eq!(extracted.names, vec!["f1".to_string()]);
        assert!(!extracted.cyclic);
    }
}
