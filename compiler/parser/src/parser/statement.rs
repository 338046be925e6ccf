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

use super::context::ParserContext;
use crate::tokenizer::Token;

use dejs_ast::*;
use dejs_errors::{ParserError, Result};

impl ParserContext {
    /// Parses a single statement.
    pub(super) fn parse_statement(&mut self) -> Result<Statement> {
        match &self.token.token {
            Token::LeftCurly => Ok(Statement::Block(self.parse_block()?)),
            Token::Var | Token::Let | Token::Const => self.parse_definition_statement(),
            Token::Function => self.parse_function_declaration(),
            Token::If => self.parse_if_statement(),
            Token::While => self.parse_while_statement(),
            Token::Do => self.parse_do_while_statement(),
            Token::For => self.parse_for_statement(),
            Token::Return => self.parse_return_statement(),
            Token::Throw => self.parse_throw_statement(),
            Token::Try => self.parse_try_statement(),
            Token::Switch => self.parse_switch_statement(),
            Token::Break => {
                let span = self.expect(&Token::Break)?;
                self.eat_semicolon();
                Ok(Statement::Break(BreakStatement { span }))
            }
            Token::Continue => {
                let span = self.expect(&Token::Continue)?;
                self.eat_semicolon();
                Ok(Statement::Continue(ContinueStatement { span }))
            }
            Token::Class | Token::Import | Token::Export | Token::With => {
                self.unexpected("a statement of the supported subset")
            }
            _ => {
                let start = self.token.span;
                let expression = self.parse_expression()?;
                self.eat_semicolon();
                Ok(Statement::Expression(ExpressionStatement {
                    expression,
                    span: start + self.prev_token.span,
                }))
            }
        }
    }

    /// Statement terminators are permissive: an explicit `;` is eaten, a
    /// missing one is accepted where automatic insertion would supply it.
    fn eat_semicolon(&mut self) {
        self.eat(&Token::Semicolon);
    }

    /// Parses a braced block. Stray semicolons between statements are
    /// skipped.
    pub(super) fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(&Token::LeftCurly)?;
        let mut statements = Vec::new();
        loop {
            if self.eat(&Token::RightCurly) {
                return Ok(Block { statements, span: start + self.prev_token.span });
            }
            if self.eat(&Token::Semicolon) {
                continue;
            }
            if !self.has_next() {
                return self.unexpected("'}'");
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_definition_statement(&mut self) -> Result<Statement> {
        let start = self.token.span;
        let kind = self.parse_declaration_kind()?;
        let declaration = self.parse_declarators(kind, start)?;
        self.eat_semicolon();
        Ok(Statement::Definition(declaration))
    }

    fn parse_declaration_kind(&mut self) -> Result<DeclarationKind> {
        if self.eat(&Token::Var) {
            Ok(DeclarationKind::Var)
        } else if self.eat(&Token::Let) {
            Ok(DeclarationKind::Let)
        } else if self.eat(&Token::Const) {
            Ok(DeclarationKind::Const)
        } else {
            self.unexpected("'var', 'let' or 'const'")
        }
    }

    /// Parses the declarator list of a declaration whose keyword was already
    /// eaten.
    fn parse_declarators(&mut self, kind: DeclarationKind, start: dejs_span::Span) -> Result<VariableDeclaration> {
        let mut declarators = Vec::new();
        loop {
            let name = self.expect_binding_ident()?;
            let declarator_start = name.span;
            let init =
                if self.eat(&Token::Assign) { Some(self.parse_assignment_expression()?) } else { None };
            declarators.push(VariableDeclarator {
                name,
                init,
                span: declarator_start + self.prev_token.span,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(VariableDeclaration { kind, declarators, span: start + self.prev_token.span })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Function)?;
        let name = self.expect_binding_ident()?;
        let (params, _) = self.parse_paren_comma_list(|p| p.expect_binding_ident())?;
        let body = self.parse_block()?;
        Ok(Statement::Function(FunctionDeclaration {
            name,
            params,
            body,
            span: start + self.prev_token.span,
        }))
    }

    fn parse_if_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::If)?;
        self.expect(&Token::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(&Token::RightParen)?;
        let then = Box::new(self.parse_statement()?);
        let otherwise = if self.eat(&Token::Else) { Some(Box::new(self.parse_statement()?)) } else { None };
        Ok(Statement::If(IfStatement { condition, then, otherwise, span: start + self.prev_token.span }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::While)?;
        self.expect(&Token::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(&Token::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While(WhileStatement { condition, body, span: start + self.prev_token.span }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.expect(&Token::While)?;
        self.expect(&Token::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(&Token::RightParen)?;
        self.eat_semicolon();
        Ok(Statement::DoWhile(DoWhileStatement { body, condition, span: start + self.prev_token.span }))
    }

    /// Is the current token the contextual keyword `of`?
    fn check_of(&self) -> bool {
        matches!(&self.token.token, Token::Ident(name) if name == "of")
    }

    fn parse_for_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::For)?;
        self.expect(&Token::LeftParen)?;

        // A declaration in the header can open either loop form.
        if matches!(self.token.token, Token::Var | Token::Let | Token::Const) {
            let kind_start = self.token.span;
            let kind = self.parse_declaration_kind()?;
            let binding = self.expect_binding_ident()?;

            if self.eat(&Token::In) {
                return self.parse_for_in_tail(Some(kind), binding, false, start);
            }
            if self.check_of() {
                self.bump();
                return self.parse_for_in_tail(Some(kind), binding, true, start);
            }

            // Back to the C-style header; finish this declarator and the rest.
            let init = if self.eat(&Token::Assign) { Some(self.parse_assignment_expression()?) } else { None };
            let mut declarators =
                vec![VariableDeclarator { name: binding.clone(), init, span: binding.span + self.prev_token.span }];
            while self.eat(&Token::Comma) {
                let name = self.expect_binding_ident()?;
                let declarator_start = name.span;
                let init =
                    if self.eat(&Token::Assign) { Some(self.parse_assignment_expression()?) } else { None };
                declarators.push(VariableDeclarator { name, init, span: declarator_start + self.prev_token.span });
            }
            let declaration =
                VariableDeclaration { kind, declarators, span: kind_start + self.prev_token.span };
            return self.parse_for_tail(ForInit::Declaration(declaration), start);
        }

        if self.check(&Token::Semicolon) {
            return self.parse_for_tail(ForInit::None, start);
        }

        let init = self.parse_expression()?;
        if self.eat(&Token::In) {
            let Expression::Identifier(binding) = init else {
                return Err(ParserError::MalformedForHeader { span: start }.into());
            };
            return self.parse_for_in_tail(None, binding, false, start);
        }
        if self.check_of() {
            let Expression::Identifier(binding) = init else {
                return Err(ParserError::MalformedForHeader { span: start }.into());
            };
            self.bump();
            return self.parse_for_in_tail(None, binding, true, start);
        }
        self.parse_for_tail(ForInit::Expression(init), start)
    }

    /// Parses `; cond? ; update? ) body` after a C-style `for` header start.
    fn parse_for_tail(&mut self, init: ForInit, start: dejs_span::Span) -> Result<Statement> {
        self.expect(&Token::Semicolon)?;
        let condition = if self.check(&Token::Semicolon) { None } else { Some(self.parse_expression()?) };
        self.expect(&Token::Semicolon)?;
        let update = if self.check(&Token::RightParen) { None } else { Some(self.parse_expression()?) };
        self.expect(&Token::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For(ForStatement { init, condition, update, body, span: start + self.prev_token.span }))
    }

    /// Parses `object ) body` after `for (binding in|of`.
    fn parse_for_in_tail(
        &mut self,
        kind: Option<DeclarationKind>,
        binding: Identifier,
        is_of: bool,
        start: dejs_span::Span,
    ) -> Result<Statement> {
        let object = self.parse_expression()?;
        self.expect(&Token::RightParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::ForIn(ForInStatement {
            kind,
            binding,
            is_of,
            object,
            body,
            span: start + self.prev_token.span,
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Return)?;
        let expression = if self.check(&Token::Semicolon)
            || self.check(&Token::RightCurly)
            || !self.has_next()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.eat_semicolon();
        Ok(Statement::Return(ReturnStatement { expression, span: start + self.prev_token.span }))
    }

    fn parse_throw_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Throw)?;
        let expression = self.parse_expression()?;
        self.eat_semicolon();
        Ok(Statement::Throw(ThrowStatement { expression, span: start + self.prev_token.span }))
    }

    fn parse_try_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Try)?;
        let block = self.parse_block()?;

        let handler = if self.eat(&Token::Catch) {
            let handler_start = self.prev_token.span;
            let param = if self.eat(&Token::LeftParen) {
                let param = self.expect_binding_ident()?;
                self.expect(&Token::RightParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause { param, body, span: handler_start + self.prev_token.span })
        } else {
            None
        };

        let finalizer = if self.eat(&Token::Finally) { Some(self.parse_block()?) } else { None };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParserError::TryWithoutHandler { span: start }.into());
        }

        Ok(Statement::Try(TryStatement { block, handler, finalizer, span: start + self.prev_token.span }))
    }

    fn parse_switch_statement(&mut self) -> Result<Statement> {
        let start = self.expect(&Token::Switch)?;
        self.expect(&Token::LeftParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(&Token::RightParen)?;
        self.expect(&Token::LeftCurly)?;

        let mut cases = Vec::new();
        while !self.eat(&Token::RightCurly) {
            let case_start = self.token.span;
            let test = if self.eat(&Token::Case) {
                let test = self.parse_expression()?;
                Some(test)
            } else if self.eat(&Token::Default) {
                None
            } else {
                return self.unexpected("'case' or 'default'");
            };
            self.expect(&Token::Colon)?;

            let mut body = Vec::new();
            while !matches!(self.token.token, Token::Case | Token::Default | Token::RightCurly | Token::Eof) {
                if self.eat(&Token::Semicolon) {
                    continue;
                }
                body.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, body, span: case_start + self.prev_token.span });
        }

        Ok(Statement::Switch(SwitchStatement { discriminant, cases, span: start + self.prev_token.span }))
    }
}
