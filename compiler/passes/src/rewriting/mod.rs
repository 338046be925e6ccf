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

//! Call rewriting.
//!
//! One reconstruction over the tree replaces each qualifying call with the
//! literal its evaluation produced, looked up by the call's printed form.
//! The outer call is checked before its children, so a rewritten call
//! swallows any nested candidates, exactly as the recorded result did.
//! Calls inside initializer contexts are never rewritten, no matter what
//! the result map holds for their printed form.

use crate::{
    DeobfuscatorState, Pass, PassConfiguration, ResultMap,
    common::{is_immediate_call, resolve_callee_name},
    helper_classification::HelperSet,
};

use dejs_ast::*;
use dejs_errors::Result;
use dejs_interpreter::{CapturedValue, format_number};
use dejs_span::Span;

use indexmap::IndexMap;
use tracing::debug;

/// The rewriting pass.
pub struct Rewriting;

impl Pass for Rewriting {
    type Input = ();
    type Output = ();

    const NAME: &str = "Rewriting";

    fn do_pass(_input: (), state: &mut DeobfuscatorState) -> Result<()> {
        if state.results.is_empty() {
            debug!("no evaluation results; skipping rewriting");
            return Ok(());
        }

        let mut rewriter = Rewriter {
            config: &state.config,
            helpers: &state.helpers,
            results: &state.results,
            rewritten: IndexMap::new(),
            initializer_depth: 0,
        };
        let program = std::mem::take(&mut state.ast).into_repr();
        let program = rewriter.reconstruct_program(program);
        let rewritten = rewriter.rewritten;
        state.ast = Ast::new(program);
        debug!(
            calls = rewritten.values().sum::<usize>(),
            helpers = rewritten.len(),
            "rewriting finished"
        );
        state.rewritten = rewritten;
        Ok(())
    }
}

struct Rewriter<'a> {
    config: &'a PassConfiguration,
    helpers: &'a HelperSet,
    results: &'a ResultMap,
    /// Successful replacements per helper name.
    rewritten: IndexMap<String, usize>,
    initializer_depth: usize,
}

impl Rewriter<'_> {
    /// The literal replacement for `call`, when every gate passes.
    fn replacement(&self, call: &CallExpression) -> Option<(String, Expression)> {
        if self.initializer_depth > 0 {
            return None;
        }
        let name = resolve_callee_name(call)?;
        if !self.helpers.contains_key(name) || !self.config.within_window(call.arguments.len()) {
            return None;
        }
        let value = self.results.get(&call.to_string())?;
        let literal = captured_to_expression(value, call.span)?;
        Some((name.to_string(), literal))
    }
}

/// Lowers a captured value to a literal expression. Negative numbers become
/// a unary minus over the positive literal, the shape the parser produces.
fn captured_to_expression(value: &CapturedValue, span: Span) -> Option<Expression> {
    let negated = |text: String| {
        Expression::Unary(UnaryExpression {
            operand: Box::new(Expression::Literal(Literal::Integer(text, span))),
            op: UnaryOperation::Minus,
            span,
        })
    };
    Some(match value {
        CapturedValue::String(value) => Expression::Literal(Literal::String(value.clone(), span)),
        CapturedValue::Integer(n) if *n < 0 => negated(n.unsigned_abs().to_string()),
        CapturedValue::Integer(n) => Expression::Literal(Literal::Integer(n.to_string(), span)),
        CapturedValue::Fractional(x) if *x < 0.0 => Expression::Unary(UnaryExpression {
            operand: Box::new(Expression::Literal(Literal::Fractional(format_number(-x), span))),
            op: UnaryOperation::Minus,
            span,
        }),
        CapturedValue::Fractional(x) => Expression::Literal(Literal::Fractional(format_number(*x), span)),
        CapturedValue::Boolean(value) => Expression::Literal(Literal::Boolean(*value, span)),
        CapturedValue::Null => Expression::Literal(Literal::Null(span)),
        CapturedValue::Undefined => Expression::Literal(Literal::Undefined(span)),
        // Defensive: unrepresentable values never enter the result map.
        CapturedValue::Unrepresentable => return None,
    })
}

impl Reconstructor for Rewriter<'_> {
    fn reconstruct_call(&mut self, input: CallExpression) -> Expression {
        if let Some((name, literal)) = self.replacement(&input) {
            *self.rewritten.entry(name).or_insert(0) += 1;
            return literal;
        }

        let entered = is_immediate_call(&input);
        if entered {
            self.initializer_depth += 1;
        }
        let rebuilt = CallExpression {
            callee: Box::new(self.reconstruct_expression(*input.callee)),
            arguments: input
                .arguments
                .into_iter()
                .map(|argument| self.reconstruct_expression(argument))
                .collect(),
            span: input.span,
        };
        if entered {
            self.initializer_depth -= 1;
        }
        Expression::Call(rebuilt)
    }

    fn reconstruct_do_while(&mut self, input: DoWhileStatement) -> Option<Statement> {
        self.initializer_depth += 1;
        let rebuilt = DoWhileStatement {
            body: Box::new(self.reconstruct_statement(*input.body)?),
            condition: self.reconstruct_expression(input.condition),
            span: input.span,
        };
        self.initializer_depth -= 1;
        Some(Statement::DoWhile(rebuilt))
    }

    fn reconstruct_while(&mut self, input: WhileStatement) -> Option<Statement> {
        self.initializer_depth += 1;
        let rebuilt = WhileStatement {
            condition: self.reconstruct_expression(input.condition),
            body: Box::new(self.reconstruct_statement(*input.body)?),
            span: input.span,
        };
        self.initializer_depth -= 1;
        Some(Statement::While(rebuilt))
    }

    fn reconstruct_try(&mut self, input: TryStatement) -> Option<Statement> {
        self.initializer_depth += 1;
        let rebuilt = TryStatement {
            block: self.reconstruct_block(input.block),
            handler: input.handler.map(|handler| CatchClause {
                param: handler.param,
                body: self.reconstruct_block(handler.body),
                span: handler.span,
            }),
            finalizer: input.finalizer.map(|finalizer| self.reconstruct_block(finalizer)),
            span: input.span,
        };
        self.initializer_depth -= 1;
        Some(Statement::Try(rebuilt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_negative_and_fractional_values() {
        let span = Span::dummy();
        assert_eq!(
            captured_to_expression(&CapturedValue::Integer(-5), span).map(|e| e.to_string()),
            Some("-5".to_string())
        );
        assert_eq!(
            captured_to_expression(&CapturedValue::Fractional(2.5), span).map(|e| e.to_string()),
            Some("2.5".to_string())
        );
        assert_eq!(
            captured_to_expression(&CapturedValue::String("a\"b".into()), span).map(|e| e.to_string()),
            Some("\"a\\\"b\"".to_string())
        );
        assert!(captured_to_expression(&CapturedValue::Unrepresentable, span).is_none());
    }
}
