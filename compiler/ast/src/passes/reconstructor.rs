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

//! This module contains a Reconstructor trait for the AST.
//!
//! Default methods rebuild each node from the reconstruction of its children.
//! Statement reconstruction returns an `Option` so a pass can drop a
//! statement outright; dropping never leaves a hole, since blocks and the
//! program filter their statement lists.

use crate::*;

/// A consuming, depth-first rebuilder of the AST.
pub trait Reconstructor {
    fn reconstruct_program(&mut self, input: Program) -> Program {
        Program {
            statements: input
                .statements
                .into_iter()
                .filter_map(|statement| self.reconstruct_statement(statement))
                .collect(),
            span: input.span,
        }
    }

    // Statements.

    fn reconstruct_statement(&mut self, input: Statement) -> Option<Statement> {
        match input {
            Statement::Block(stmt) => Some(Statement::Block(self.reconstruct_block(stmt))),
            Statement::Break(stmt) => self.reconstruct_break(stmt),
            Statement::Comment(stmt) => self.reconstruct_comment(stmt),
            Statement::Continue(stmt) => self.reconstruct_continue(stmt),
            Statement::Definition(stmt) => self.reconstruct_definition(stmt),
            Statement::DoWhile(stmt) => self.reconstruct_do_while(stmt),
            Statement::Expression(stmt) => self.reconstruct_expression_statement(stmt),
            Statement::For(stmt) => self.reconstruct_for(stmt),
            Statement::ForIn(stmt) => self.reconstruct_for_in(stmt),
            Statement::Function(stmt) => self.reconstruct_function(stmt),
            Statement::If(stmt) => self.reconstruct_if(stmt),
            Statement::Return(stmt) => self.reconstruct_return(stmt),
            Statement::Switch(stmt) => self.reconstruct_switch(stmt),
            Statement::Throw(stmt) => self.reconstruct_throw(stmt),
            Statement::Try(stmt) => self.reconstruct_try(stmt),
            Statement::While(stmt) => self.reconstruct_while(stmt),
        }
    }

    fn reconstruct_block(&mut self, input: Block) -> Block {
        Block {
            statements: input
                .statements
                .into_iter()
                .filter_map(|statement| self.reconstruct_statement(statement))
                .collect(),
            span: input.span,
        }
    }

    fn reconstruct_break(&mut self, input: BreakStatement) -> Option<Statement> {
        Some(Statement::Break(input))
    }

    fn reconstruct_comment(&mut self, input: CommentStatement) -> Option<Statement> {
        Some(Statement::Comment(input))
    }

    fn reconstruct_continue(&mut self, input: ContinueStatement) -> Option<Statement> {
        Some(Statement::Continue(input))
    }

    fn reconstruct_definition(&mut self, input: VariableDeclaration) -> Option<Statement> {
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

    fn reconstruct_do_while(&mut self, input: DoWhileStatement) -> Option<Statement> {
        Some(Statement::DoWhile(DoWhileStatement {
            body: Box::new(self.reconstruct_statement(*input.body)?),
            condition: self.reconstruct_expression(input.condition),
            span: input.span,
        }))
    }

    fn reconstruct_expression_statement(&mut self, input: ExpressionStatement) -> Option<Statement> {
        Some(Statement::Expression(ExpressionStatement {
            expression: self.reconstruct_expression(input.expression),
            span: input.span,
        }))
    }

    fn reconstruct_for(&mut self, input: ForStatement) -> Option<Statement> {
        let init = match input.init {
            ForInit::None => ForInit::None,
            ForInit::Declaration(declaration) => match self.reconstruct_definition(declaration)? {
                Statement::Definition(declaration) => ForInit::Declaration(declaration),
                _ => ForInit::None,
            },
            ForInit::Expression(expression) => ForInit::Expression(self.reconstruct_expression(expression)),
        };
        Some(Statement::For(ForStatement {
            init,
            condition: input.condition.map(|condition| self.reconstruct_expression(condition)),
            update: input.update.map(|update| self.reconstruct_expression(update)),
            body: Box::new(self.reconstruct_statement(*input.body)?),
            span: input.span,
        }))
    }

    fn reconstruct_for_in(&mut self, input: ForInStatement) -> Option<Statement> {
        Some(Statement::ForIn(ForInStatement {
            kind: input.kind,
            binding: input.binding,
            is_of: input.is_of,
            object: self.reconstruct_expression(input.object),
            body: Box::new(self.reconstruct_statement(*input.body)?),
            span: input.span,
        }))
    }

    fn reconstruct_function(&mut self, input: FunctionDeclaration) -> Option<Statement> {
        Some(Statement::Function(FunctionDeclaration {
            name: input.name,
            params: input.params,
            body: self.reconstruct_block(input.body),
            span: input.span,
        }))
    }

    fn reconstruct_if(&mut self, input: IfStatement) -> Option<Statement> {
        Some(Statement::If(IfStatement {
            condition: self.reconstruct_expression(input.condition),
            then: Box::new(self.reconstruct_statement(*input.then)?),
            otherwise: match input.otherwise {
                Some(otherwise) => Some(Box::new(self.reconstruct_statement(*otherwise)?)),
                None => None,
            },
            span: input.span,
        }))
    }

    fn reconstruct_return(&mut self, input: ReturnStatement) -> Option<Statement> {
        Some(Statement::Return(ReturnStatement {
            expression: input.expression.map(|expression| self.reconstruct_expression(expression)),
            span: input.span,
        }))
    }

    fn reconstruct_switch(&mut self, input: SwitchStatement) -> Option<Statement> {
        Some(Statement::Switch(SwitchStatement {
            discriminant: self.reconstruct_expression(input.discriminant),
            cases: input
                .cases
                .into_iter()
                .map(|case| SwitchCase {
                    test: case.test.map(|test| self.reconstruct_expression(test)),
                    body: case.body.into_iter().filter_map(|statement| self.reconstruct_statement(statement)).collect(),
                    span: case.span,
                })
                .collect(),
            span: input.span,
        }))
    }

    fn reconstruct_throw(&mut self, input: ThrowStatement) -> Option<Statement> {
        Some(Statement::Throw(ThrowStatement {
            expression: self.reconstruct_expression(input.expression),
            span: input.span,
        }))
    }

    fn reconstruct_try(&mut self, input: TryStatement) -> Option<Statement> {
        Some(Statement::Try(TryStatement {
            block: self.reconstruct_block(input.block),
            handler: input.handler.map(|handler| CatchClause {
                param: handler.param,
                body: self.reconstruct_block(handler.body),
                span: handler.span,
            }),
            finalizer: input.finalizer.map(|finalizer| self.reconstruct_block(finalizer)),
            span: input.span,
        }))
    }

    fn reconstruct_while(&mut self, input: WhileStatement) -> Option<Statement> {
        Some(Statement::While(WhileStatement {
            condition: self.reconstruct_expression(input.condition),
            body: Box::new(self.reconstruct_statement(*input.body)?),
            span: input.span,
        }))
    }

    // Expressions.

    fn reconstruct_expression(&mut self, input: Expression) -> Expression {
        match input {
            Expression::Array(expr) => self.reconstruct_array(expr),
            Expression::Arrow(expr) => self.reconstruct_arrow(expr),
            Expression::Assignment(expr) => self.reconstruct_assignment(expr),
            Expression::Binary(expr) => self.reconstruct_binary(expr),
            Expression::Call(expr) => self.reconstruct_call(expr),
            Expression::Conditional(expr) => self.reconstruct_conditional(expr),
            Expression::Function(expr) => self.reconstruct_function_expression(expr),
            Expression::Identifier(expr) => self.reconstruct_identifier(expr),
            Expression::Literal(expr) => self.reconstruct_literal(expr),
            Expression::Member(expr) => self.reconstruct_member(expr),
            Expression::New(expr) => self.reconstruct_new(expr),
            Expression::Object(expr) => self.reconstruct_object(expr),
            Expression::Sequence(expr) => self.reconstruct_sequence(expr),
            Expression::Unary(expr) => self.reconstruct_unary(expr),
            Expression::Update(expr) => self.reconstruct_update(expr),
        }
    }

    fn reconstruct_array(&mut self, input: ArrayExpression) -> Expression {
        Expression::Array(ArrayExpression {
            elements: input.elements.into_iter().map(|element| self.reconstruct_expression(element)).collect(),
            span: input.span,
        })
    }

    fn reconstruct_arrow(&mut self, input: ArrowFunction) -> Expression {
        Expression::Arrow(ArrowFunction {
            params: input.params,
            body: match input.body {
                ArrowBody::Block(block) => ArrowBody::Block(self.reconstruct_block(block)),
                ArrowBody::Expression(expression) => {
                    ArrowBody::Expression(Box::new(self.reconstruct_expression(*expression)))
                }
            },
            span: input.span,
        })
    }

    fn reconstruct_assignment(&mut self, input: AssignmentExpression) -> Expression {
        Expression::Assignment(AssignmentExpression {
            target: Box::new(self.reconstruct_expression(*input.target)),
            value: Box::new(self.reconstruct_expression(*input.value)),
            op: input.op,
            span: input.span,
        })
    }

    fn reconstruct_binary(&mut self, input: BinaryExpression) -> Expression {
        Expression::Binary(BinaryExpression {
            left: Box::new(self.reconstruct_expression(*input.left)),
            right: Box::new(self.reconstruct_expression(*input.right)),
            op: input.op,
            span: input.span,
        })
    }

    fn reconstruct_call(&mut self, input: CallExpression) -> Expression {
        Expression::Call(CallExpression {
            callee: Box::new(self.reconstruct_expression(*input.callee)),
            arguments: input.arguments.into_iter().map(|argument| self.reconstruct_expression(argument)).collect(),
            span: input.span,
        })
    }

    fn reconstruct_conditional(&mut self, input: ConditionalExpression) -> Expression {
        Expression::Conditional(ConditionalExpression {
            test: Box::new(self.reconstruct_expression(*input.test)),
            consequent: Box::new(self.reconstruct_expression(*input.consequent)),
            alternate: Box::new(self.reconstruct_expression(*input.alternate)),
            span: input.span,
        })
    }

    fn reconstruct_function_expression(&mut self, input: FunctionExpression) -> Expression {
        Expression::Function(FunctionExpression {
            name: input.name,
            params: input.params,
            body: self.reconstruct_block(input.body),
            span: input.span,
        })
    }

    fn reconstruct_identifier(&mut self, input: Identifier) -> Expression {
        Expression::Identifier(input)
    }

    fn reconstruct_literal(&mut self, input: Literal) -> Expression {
        Expression::Literal(input)
    }

    fn reconstruct_member(&mut self, input: MemberExpression) -> Expression {
        Expression::Member(MemberExpression {
            object: Box::new(self.reconstruct_expression(*input.object)),
            property: match input.property {
                MemberProperty::Identifier(name) => MemberProperty::Identifier(name),
                MemberProperty::Computed(key) => MemberProperty::Computed(Box::new(self.reconstruct_expression(*key))),
            },
            span: input.span,
        })
    }

    fn reconstruct_new(&mut self, input: NewExpression) -> Expression {
        Expression::New(NewExpression {
            callee: Box::new(self.reconstruct_expression(*input.callee)),
            arguments: input.arguments.into_iter().map(|argument| self.reconstruct_expression(argument)).collect(),
            span: input.span,
        })
    }

    fn reconstruct_object(&mut self, input: ObjectExpression) -> Expression {
        Expression::Object(ObjectExpression {
            properties: input
                .properties
                .into_iter()
                .map(|property| ObjectProperty {
                    key: match property.key {
                        PropertyKey::Computed(key) => {
                            PropertyKey::Computed(Box::new(self.reconstruct_expression(*key)))
                        }
                        key => key,
                    },
                    value: self.reconstruct_expression(property.value),
                    span: property.span,
                })
                .collect(),
            span: input.span,
        })
    }

    fn reconstruct_sequence(&mut self, input: SequenceExpression) -> Expression {
        Expression::Sequence(SequenceExpression {
            expressions: input
                .expressions
                .into_iter()
                .map(|expression| self.reconstruct_expression(expression))
                .collect(),
            span: input.span,
        })
    }

    fn reconstruct_unary(&mut self, input: UnaryExpression) -> Expression {
        Expression::Unary(UnaryExpression {
            operand: Box::new(self.reconstruct_expression(*input.operand)),
            op: input.op,
            span: input.span,
        })
    }

    fn reconstruct_update(&mut self, input: UpdateExpression) -> Expression {
        Expression::Update(UpdateExpression {
            operand: Box::new(self.reconstruct_expression(*input.operand)),
            op: input.op,
            prefix: input.prefix,
            span: input.span,
        })
    }
}
