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

//! Helper classification.
//!
//! One traversal collects every definition whose name matches the intercept
//! pattern: function declarations and function-valued bindings, at any
//! nesting depth. The argument-count window plays no role here; it gates
//! rewriting, not extraction.

use crate::{DeobfuscatorState, Pass, PassConfiguration};

use dejs_ast::*;
use dejs_errors::Result;

use indexmap::IndexMap;
use tracing::debug;

/// The two shapes a helper definition takes in source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HelperKind {
    /// `function f123(…) { … }`
    Declaration,
    /// `var f123 = function (…) { … };` (or an arrow).
    Binding,
}

/// One classified helper.
#[derive(Debug, Clone)]
pub struct HelperDefinition {
    pub name: String,
    pub kind: HelperKind,
    /// A standalone statement defining the helper; for bindings this is the
    /// declarator lifted into its own declaration, so it can be emitted into
    /// the evaluator program as-is.
    pub statement: Statement,
    /// The declared parameter count.
    pub params: usize,
}

/// The classified helpers, in discovery order. A redefinition of the same
/// name keeps the later definition, matching the source language.
pub type HelperSet = IndexMap<String, HelperDefinition>;

/// The classification pass.
pub struct HelperClassification;

impl Pass for HelperClassification {
    type Input = ();
    type Output = ();

    const NAME: &str = "HelperClassification";

    fn do_pass(_input: (), state: &mut DeobfuscatorState) -> Result<()> {
        let mut classifier = Classifier { config: &state.config, helpers: HelperSet::default() };
        classifier.visit_program(state.ast.as_repr());
        debug!(helpers = classifier.helpers.len(), "helper classification finished");
        state.helpers = classifier.helpers;
        Ok(())
    }
}

struct Classifier<'a> {
    config: &'a PassConfiguration,
    helpers: HelperSet,
}

impl<'a> Visitor<'a> for Classifier<'_> {
    fn visit_function(&mut self, input: &'a FunctionDeclaration) {
        if self.config.intercepts(&input.name.name) {
            self.helpers.insert(input.name.name.clone(), HelperDefinition {
                name: input.name.name.clone(),
                kind: HelperKind::Declaration,
                statement: Statement::Function(input.clone()),
                params: input.params.len(),
            });
        }
        self.visit_block(&input.body);
    }

    fn visit_definition(&mut self, input: &'a VariableDeclaration) {
        for declarator in &input.declarators {
            let params = match &declarator.init {
                Some(Expression::Function(function)) => Some(function.params.len()),
                Some(Expression::Arrow(arrow)) => Some(arrow.params.len()),
                _ => None,
            };
            if let Some(params) = params
                && self.config.intercepts(&declarator.name.name)
            {
                let lifted = VariableDeclaration {
                    kind: input.kind,
                    declarators: vec![declarator.clone()],
                    span: declarator.span,
                };
                self.helpers.insert(declarator.name.name.clone(), HelperDefinition {
                    name: declarator.name.name.clone(),
                    kind: HelperKind::Binding,
                    statement: Statement::Definition(lifted),
                    params,
                });
            }
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassConfiguration;
    use std::time::Duration;

    fn classify(source: &str) -> HelperSet {
        let config = PassConfiguration::new(
            r"^f\d+$",
            None,
            0,
            9,
            Duration::from_secs(5),
            false,
        )
        .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        state.helpers
    }

    #[test]
    fn finds_declarations_and_bindings() {
        let helpers = classify(
            "function f1(a) { return a; }\n\
             var f2 = function (a, b) { return a + b; }, keep = 1;\n\
             var other = function () {};\n",
        );
        assert_eq!(helpers.len(), 2);
        assert_eq!(helpers["f1"].kind, HelperKind::Declaration);
        assert_eq!(helpers["f2"].kind, HelperKind::Binding);
        assert_eq!(helpers["f2"].params, 2);
        // The lifted binding stands alone.
        assert_eq!(helpers["f2"].statement.to_string(), "var f2 = function (a, b) {\n    return a + b;\n};");
    }

    #[test]
    fn finds_nested_helpers() {
        let helpers = classify("(function () { function f9(x) { return x; } })();");
        assert!(helpers.contains_key("f9"));
    }

    #[test]
    fn redefinition_keeps_the_last_definition() {
        let helpers = classify("function f1() { return 1; }\nfunction f1() { return 2; }\n");
        assert!(helpers["f1"].statement.to_string().contains("return 2;"));
    }
}
