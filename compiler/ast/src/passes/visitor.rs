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

//! This module contains a Visitor trait for the AST.
//!
//! Default methods visit every child depth-first; a pass overrides the
//! variants it cares about and calls the default walk for the rest. Function
//! bodies are expressions containing statements, so one trait covers both
//! syntactic categories.

use crate::*;

/// A read-only, depth-first visitor over the AST.
pub trait Visitor<'a> {
    fn visit_program(&mut self, input: &'a Program) {
        input.statements.iter().for_each(|statement| self.visit_statement(statement));
    }

    // Statements.

    fn visit_statement(&mut self, input: &'a Statement) {
        match input {
            Statement::Block(stmt) => self.visit_block(stmt),
            Statement::Break(stmt) => self.visit_break(stmt),
            Statement::Comment(stmt) => self.visit_comment(stmt),
            Statement::Continue(stmt) => self.visit_continue(stmt),
            Statement::Definition(stmt) => self.visit_definition(stmt),
            Statement::DoWhile(stmt) => self.visit_do_while(stmt),
            Statement::Expression(stmt) => self.visit_expression_statement(stmt),
            Statement::For(stmt) => self.visit_for(stmt),
            Statement::ForIn(stmt) => self.visit_for_in(stmt),
            Statement::Function(stmt) => self.visit_function(stmt),
            Statement::If(stmt) => self.visit_if(stmt),
            Statement::Return(stmt) => self.visit_return(stmt),
            Statement::Switch(stmt) => self.visit_switch(stmt),
            Statement::Throw(stmt) => self.visit_throw(stmt),
            Statement::Try(stmt) => self.visit_try(stmt),
            Statement::While(stmt) => self.visit_while(stmt),
        }
    }

    fn visit_block(&mut self, input: &'a Block) {
        input.statements.iter().for_each(|statement| self.visit_statement(statement));
    }

    fn visit_break(&mut self, _input: &'a BreakStatement) {}

    fn visit_comment(&mut self, _input: &'a CommentStatement) {}

    fn visit_continue(&mut self, _input: &'a ContinueStatement) {}

    fn visit_definition(&mut self, input: &'a VariableDeclaration) {
        for declarator in &input.declarators {
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    fn visit_do_while(&mut self, input: &'a DoWhileStatement) {
        self.visit_statement(&input.body);
        self.visit_expression(&input.condition);
    }

    fn visit_expression_statement(&mut self, input: &'a ExpressionStatement) {
        self.visit_expression(&input.expression);
    }

    fn visit_for(&mut self, input: &'a ForStatement) {
        match &input.init {
            ForInit::None => {}
            ForInit::Declaration(declaration) => self.visit_definition(declaration),
            ForInit::Expression(expression) => self.visit_expression(expression),
        }
        if let Some(condition) = &input.condition {
            self.visit_expression(condition);
        }
        if let Some(update) = &input.update {
            self.visit_expression(update);
        }
        self.visit_statement(&input.body);
    }

    fn visit_for_in(&mut self, input: &'a ForInStatement) {
        self.visit_expression(&input.object);
        self.visit_statement(&input.body);
    }

    fn visit_function(&mut self, input: &'a FunctionDeclaration) {
        self.visit_block(&input.body);
    }

    fn visit_if(&mut self, input: &'a IfStatement) {
        self.visit_expression(&input.condition);
        self.visit_statement(&input.then);
        if let Some(otherwise) = &input.otherwise {
            self.visit_statement(otherwise);
        }
    }

    fn visit_return(&mut self, input: &'a ReturnStatement) {
        if let Some(expression) = &input.expression {
            self.visit_expression(expression);
        }
    }

    fn visit_switch(&mut self, input: &'a SwitchStatement) {
        self.visit_expression(&input.discriminant);
        for case in &input.cases {
            if let Some(test) = &case.test {
                self.visit_expression(test);
            }
            case.body.iter().for_each(|statement| self.visit_statement(statement));
        }
    }

    fn visit_throw(&mut self, input: &'a ThrowStatement) {
        self.visit_expression(&input.expression);
    }

    fn visit_try(&mut self, input: &'a TryStatement) {
        self.visit_block(&input.block);
        if let Some(handler) = &input.handler {
            self.visit_block(&handler.body);
        }
        if let Some(finalizer) = &input.finalizer {
            self.visit_block(finalizer);
        }
    }

    fn visit_while(&mut self, input: &'a WhileStatement) {
        self.visit_expression(&input.condition);
        self.visit_statement(&input.body);
    }

    // Expressions.

    fn visit_expression(&mut self, input: &'a Expression) {
        match input {
            Expression::Array(expr) => self.visit_array(expr),
            Expression::Arrow(expr) => self.visit_arrow(expr),
            Expression::Assignment(expr) => self.visit_assignment(expr),
            Expression::Binary(expr) => self.visit_binary(expr),
            Expression::Call(expr) => self.visit_call(expr),
            Expression::Conditional(expr) => self.visit_conditional(expr),
            Expression::Function(expr) => self.visit_function_expression(expr),
            Expression::Identifier(expr) => self.visit_identifier(expr),
            Expression::Literal(expr) => self.visit_literal(expr),
            Expression::Member(expr) => self.visit_member(expr),
            Expression::New(expr) => self.visit_new(expr),
            Expression::Object(expr) => self.visit_object(expr),
            Expression::Sequence(expr) => self.visit_sequence(expr),
            Expression::Unary(expr) => self.visit_unary(expr),
            Expression::Update(expr) => self.visit_update(expr),
        }
    }

    fn visit_array(&mut self, input: &'a ArrayExpression) {
        input.elements.iter().for_each(|element| self.visit_expression(element));
    }

    fn visit_arrow(&mut self, input: &'a ArrowFunction) {
        match &input.body {
            ArrowBody::Block(block) => self.visit_block(block),
            ArrowBody::Expression(expression) => self.visit_expression(expression),
        }
    }

    fn visit_assignment(&mut self, input: &'a AssignmentExpression) {
        self.visit_expression(&input.target);
        self.visit_expression(&input.value);
    }

    fn visit_binary(&mut self, input: &'a BinaryExpression) {
        self.visit_expression(&input.left);
        self.visit_expression(&input.right);
    }

    fn visit_call(&mut self, input: &'a CallExpression) {
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }

    fn visit_conditional(&mut self, input: &'a ConditionalExpression) {
        self.visit_expression(&input.test);
        self.visit_expression(&input.consequent);
        self.visit_expression(&input.alternate);
    }

    fn visit_function_expression(&mut self, input: &'a FunctionExpression) {
        self.visit_block(&input.body);
    }

    fn visit_identifier(&mut self, _input: &'a Identifier) {}

    fn visit_literal(&mut self, _input: &'a Literal) {}

    fn visit_member(&mut self, input: &'a MemberExpression) {
        self.visit_expression(&input.object);
        if let MemberProperty::Computed(key) = &input.property {
            self.visit_expression(key);
        }
    }

    fn visit_new(&mut self, input: &'a NewExpression) {
        self.visit_expression(&input.callee);
        input.arguments.iter().for_each(|argument| self.visit_expression(argument));
    }

    fn visit_object(&mut self, input: &'a ObjectExpression) {
        for property in &input.properties {
            if let PropertyKey::Computed(key) = &property.key {
                self.visit_expression(key);
            }
            self.visit_expression(&property.value);
        }
    }

    fn visit_sequence(&mut self, input: &'a SequenceExpression) {
        input.expressions.iter().for_each(|expression| self.visit_expression(expression));
    }

    fn visit_unary(&mut self, input: &'a UnaryExpression) {
        self.visit_expression(&input.operand);
    }

    fn visit_update(&mut self, input: &'a UpdateExpression) {
        self.visit_expression(&input.operand);
    }
}
