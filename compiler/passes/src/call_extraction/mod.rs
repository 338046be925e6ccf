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

//! Call-site extraction.
//!
//! Candidate calls are reached through a fixed set of syntactic contexts:
//! plain statement expressions, binding and assignment right-hand sides,
//! object-field values, array elements, and nested call arguments. A
//! candidate joins the pure set P when its callee resolves to a helper name,
//! it lies outside every initializer context, and every argument is a
//! literal. Calls rejected only by the argument-count window still seed the
//! dependency closure.

use crate::{
    DeobfuscatorState, Pass, PassConfiguration,
    common::{is_immediate_call, resolve_callee_name},
    helper_classification::HelperSet,
};

use dejs_ast::*;
use dejs_errors::Result;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

/// A pure constant-argument call site.
#[derive(Debug, Clone)]
pub struct PureCall {
    /// The printed call expression; the key of the result map.
    pub key: String,
    /// The resolved callee name.
    pub callee: String,
    /// The printed literal arguments.
    pub arguments: Vec<String>,
}

/// The extraction pass.
pub struct CallExtraction;

impl Pass for CallExtraction {
    type Input = ();
    type Output = ();

    const NAME: &str = "CallExtraction";

    fn do_pass(_input: (), state: &mut DeobfuscatorState) -> Result<()> {
        let mut extractor = Extractor {
            config: &state.config,
            helpers: &state.helpers,
            initializer_depth: 0,
            pure: IndexMap::new(),
            window_rejected: IndexSet::new(),
        };
        extractor.visit_program(state.ast.as_repr());
        debug!(
            pure_calls = extractor.pure.len(),
            window_rejected = extractor.window_rejected.len(),
            "call extraction finished"
        );
        state.pure_calls = extractor.pure.into_values().collect();
        state.window_rejected = extractor.window_rejected;
        Ok(())
    }
}

struct Extractor<'a> {
    config: &'a PassConfiguration,
    helpers: &'a HelperSet,
    initializer_depth: usize,
    /// Pure calls keyed by printed form; textually identical sites collapse.
    pure: IndexMap<String, PureCall>,
    window_rejected: IndexSet<String>,
}

impl Extractor<'_> {
    /// Walks an expression that occupies a candidate context, capturing the
    /// calls the context exposes.
    fn consider(&mut self, expression: &Expression) {
        match expression {
            Expression::Call(call) => {
                self.try_capture(call);
                // The arguments of an immediately-invoked call sit inside
                // its initializer context.
                let entered = is_immediate_call(call);
                if entered {
                    self.initializer_depth += 1;
                }
                for argument in &call.arguments {
                    self.consider(argument);
                }
                if entered {
                    self.initializer_depth -= 1;
                }
            }
            Expression::Assignment(assignment) => self.consider(&assignment.value),
            Expression::Array(array) => {
                for element in &array.elements {
                    self.consider(element);
                }
            }
            Expression::Object(object) => {
                for property in &object.properties {
                    self.consider(&property.value);
                }
            }
            Expression::Sequence(sequence) => {
                for expression in &sequence.expressions {
                    self.consider(expression);
                }
            }
            _ => {}
        }
    }

    fn try_capture(&mut self, call: &CallExpression) {
        let Some(name) = resolve_callee_name(call) else { return };
        if !self.config.evaluates(name) || self.initializer_depth > 0 {
            return;
        }

        let arguments: Option<Vec<String>> = call.arguments.iter().map(capture_literal).collect();
        let Some(arguments) = arguments else { return };

        if !self.helpers.contains_key(name) {
            // The name looks like a helper but nothing in the tree defines
            // it; the call is left untouched.
            warn!(name, "call references a helper with no definition");
            return;
        }

        if !self.config.within_window(arguments.len()) {
            self.window_rejected.insert(name.to_string());
            return;
        }

        let key = call.to_string();
        self.pure
            .entry(key.clone())
            .or_insert_with(|| PureCall { key, callee: name.to_string(), arguments });
    }
}

/// Captures one literal argument as its printed form: a literal of the
/// representable kinds, or a unary negation of a numeric literal. Anything
/// else disqualifies the whole call.
fn capture_literal(expression: &Expression) -> Option<String> {
    match expression {
        Expression::Literal(
            Literal::String(..)
            | Literal::Integer(..)
            | Literal::Fractional(..)
            | Literal::Boolean(..)
            | Literal::Null(_)
            | Literal::Undefined(_),
        ) => Some(expression.to_string()),
        Expression::Unary(unary)
            if unary.op == UnaryOperation::Minus
                && matches!(
                    &*unary.operand,
                    Expression::Literal(Literal::Integer(..) | Literal::Fractional(..))
                ) =>
        {
            Some(expression.to_string())
        }
        _ => None,
    }
}

impl<'a> Visitor<'a> for Extractor<'_> {
    fn visit_expression_statement(&mut self, input: &'a ExpressionStatement) {
        self.consider(&input.expression);
        self.visit_expression(&input.expression);
    }

    fn visit_definition(&mut self, input: &'a VariableDeclaration) {
        for declarator in &input.declarators {
            if let Some(init) = &declarator.init {
                self.consider(init);
                self.visit_expression(init);
            }
        }
    }

    fn visit_call(&mut self, input: &'a CallExpression) {
        if is_immediate_call(input) {
            self.initializer_depth += 1;
            self.visit_expression(&input.callee);
            input.arguments.iter().for_each(|argument| self.visit_expression(argument));
            self.initializer_depth -= 1;
        } else {
            self.visit_expression(&input.callee);
            input.arguments.iter().for_each(|argument| self.visit_expression(argument));
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
    use crate::helper_classification::HelperClassification;
    use std::time::Duration;

    fn extract(source: &str) -> (Vec<PureCall>, IndexSet<String>) {
        let config =
            PassConfiguration::new(r"^f\d+$", None, 4, 6, Duration::from_secs(5), false)
                .expect("the test pattern is valid");
        let ast = dejs_parser::parse_ast(source).expect("the test source parses");
        let mut state = DeobfuscatorState::new(ast, config);
        HelperClassification::do_pass((), &mut state).expect("classification cannot fail");
        CallExtraction::do_pass((), &mut state).expect("extraction cannot fail");
        (state.pure_calls, state.window_rejected)
    }

    const HELPER: &str = "function f123(a, b, c, d) { return a + b + c + d; }\n";

    #[test]
    fn captures_literal_argument_calls() {
        let (pure, _) = extract(&format!("{HELPER}var x = f123(1, 2, 3, 4);"));
        assert_eq!(pure.len(), 1);
        assert_eq!(pure[0].key, "f123(1, 2, 3, 4)");
        assert_eq!(pure[0].callee, "f123");
        assert_eq!(pure[0].arguments, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn rejects_non_literal_arguments() {
        let (pure, rejected) = extract(&format!("{HELPER}var x = f123(1, 2, 3, k);"));
        assert!(pure.is_empty());
        assert!(rejected.is_empty());
    }

    #[test]
    fn negated_literals_count_as_literals() {
        let (pure, _) = extract(&format!("{HELPER}var x = f123(-1, 2.5, \"s\", null);"));
        assert_eq!(pure.len(), 1);
        assert_eq!(pure[0].arguments[0], "-1");
    }

    #[test]
    fn rejects_calls_inside_initializer_contexts() {
        let (pure, _) = extract(&format!("{HELPER}(function () {{ f123(1, 2, 3, 4); }})();"));
        assert!(pure.is_empty());
        let (pure, _) = extract(&format!("{HELPER}do {{ f123(1, 2, 3, 4); }} while (false);"));
        assert!(pure.is_empty());
        let (pure, _) = extract(&format!("{HELPER}try {{ f123(1, 2, 3, 4); }} catch (e) {{}}"));
        assert!(pure.is_empty());
    }

    #[test]
    fn reserved_property_calls_are_not_candidates() {
        let (pure, _) = extract("obj.default(1, 2, 3, 4);");
        assert!(pure.is_empty());
    }

    #[test]
    fn member_property_calls_resolve_to_helper_names() {
        let (pure, _) = extract(&format!("{HELPER}var x = util.f123(1, 2, 3, 4);"));
        assert_eq!(pure.len(), 1);
        assert_eq!(pure[0].callee, "f123");
        assert_eq!(pure[0].key, "util.f123(1, 2, 3, 4)");
    }

    #[test]
    fn window_rejected_calls_still_seed_resolution() {
        let (pure, rejected) = extract(&format!("{HELPER}var x = f123(1, 2);"));
        assert!(pure.is_empty());
        assert!(rejected.contains("f123"));
    }

    #[test]
    fn nested_call_arguments_are_candidates() {
        let source = format!("{HELPER}function f9(a, b, c, d) {{ return a; }}\nvar x = g(f123(1, 2, 3, 4));");
        let (pure, _) = extract(&source);
        assert_eq!(pure.len(), 1);
        assert_eq!(pure[0].callee, "f123");
    }

    #[test]
    fn identical_sites_collapse_to_one_key() {
        let (pure, _) = extract(&format!("{HELPER}var x = f123(1, 2, 3, 4);\nvar y = f123(1, 2, 3, 4);"));
        assert_eq!(pure.len(), 1);
    }
}
