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
    /// Parses a full expression: a comma sequence of assignment expressions.
    pub(super) fn parse_expression(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let first = self.parse_assignment_expression()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.eat(&Token::Comma) {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(Expression::Sequence(SequenceExpression { expressions, span: start + self.prev_token.span }))
    }

    /// Parses an assignment-level expression, including arrow functions.
    pub(super) fn parse_assignment_expression(&mut self) -> Result<Expression> {
        if self.peek_is_arrow() {
            return self.parse_arrow_function();
        }

        let start = self.token.span;
        let expr = self.parse_conditional_expression()?;

        if let Some(op) = self.eat_assignment_op() {
            if !matches!(expr, Expression::Identifier(_) | Expression::Member(_)) {
                return Err(ParserError::InvalidAssignmentTarget { span: start }.into());
            }
            let value = self.parse_assignment_expression()?;
            return Ok(Expression::Assignment(AssignmentExpression {
                target: Box::new(expr),
                value: Box::new(value),
                op,
                span: start + self.prev_token.span,
            }));
        }

        Ok(expr)
    }

    /// Eats an assignment operator, simple or compound, if one is next.
    fn eat_assignment_op(&mut self) -> Option<AssignmentOperation> {
        use AssignmentOperation::*;
        let op = match &self.token.token {
            Token::Assign => Assign,
            Token::AddAssign => AddAssign,
            Token::SubAssign => SubAssign,
            Token::MulAssign => MulAssign,
            Token::DivAssign => DivAssign,
            Token::ModAssign => ModAssign,
            Token::BitAndAssign => BitAndAssign,
            Token::BitOrAssign => BitOrAssign,
            Token::BitXorAssign => BitXorAssign,
            Token::ShlAssign => ShlAssign,
            Token::ShrAssign => ShrAssign,
            Token::UnsignedShrAssign => UnsignedShrAssign,
            _ => return None,
        };
        self.bump();
        Some(op)
    }

    /// Returns `true` if an arrow function starts at the current token:
    /// either `name =>` or a parenthesized parameter list followed by `=>`.
    fn peek_is_arrow(&self) -> bool {
        match &self.token.token {
            Token::Ident(_) => self.look_ahead(1, |t| matches!(t, Token::FatArrow)),
            Token::LeftParen => {
                let mut depth = 1usize;
                let mut dist = 1usize;
                loop {
                    enum Step {
                        Deeper,
                        Shallower,
                        Truncated,
                        Other,
                    }
                    let step = self.look_ahead(dist, |t| match t {
                        Token::LeftParen => Step::Deeper,
                        Token::RightParen => Step::Shallower,
                        Token::Eof => Step::Truncated,
                        _ => Step::Other,
                    });
                    match step {
                        // A truncated input is not an arrow.
                        Step::Truncated => return false,
                        Step::Deeper => depth += 1,
                        Step::Shallower => {
                            depth -= 1;
                            if depth == 0 {
                                return self.look_ahead(dist + 1, |t| matches!(t, Token::FatArrow));
                            }
                        }
                        Step::Other => {}
                    }
                    dist += 1;
                }
            }
            _ => false,
        }
    }

    /// Parses an arrow function at the current token.
    fn parse_arrow_function(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let params = if let Some(param) = self.eat_identifier() {
            vec![param]
        } else {
            let (params, _) = self.parse_paren_comma_list(|p| p.expect_binding_ident())?;
            params
        };
        self.expect(&Token::FatArrow)?;
        let body = if self.check(&Token::LeftCurly) {
            ArrowBody::Block(self.parse_block()?)
        } else {
            ArrowBody::Expression(Box::new(self.parse_assignment_expression()?))
        };
        Ok(Expression::Arrow(ArrowFunction { params, body, span: start + self.prev_token.span }))
    }

    /// Parses a ternary conditional or anything tighter.
    fn parse_conditional_expression(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let test = self.parse_binary_expression(0)?;
        if !self.eat(&Token::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment_expression()?;
        self.expect(&Token::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: start + self.prev_token.span,
        }))
    }

    /// The number of binary precedence levels, loosest to tightest.
    const BINARY_LEVEL_COUNT: usize = 10;

    /// Eats a binary operator belonging to precedence level `level`, if one
    /// is next.
    fn eat_binary_op_at(&mut self, level: usize) -> Option<BinaryOperation> {
        use BinaryOperation::*;
        let op = match (level, &self.token.token) {
            (0, Token::Or) => Or,
            (1, Token::And) => And,
            (2, Token::BitOr) => BitOr,
            (3, Token::BitXor) => BitXor,
            (4, Token::BitAnd) => BitAnd,
            (5, Token::StrictEq) => StrictEq,
            (5, Token::StrictNotEq) => StrictNotEq,
            (5, Token::Eq) => Eq,
            (5, Token::NotEq) => NotEq,
            (6, Token::LtEq) => LtEq,
            (6, Token::Lt) => Lt,
            (6, Token::GtEq) => GtEq,
            (6, Token::Gt) => Gt,
            (6, Token::In) => In,
            (6, Token::Instanceof) => Instanceof,
            (7, Token::UnsignedShr) => UnsignedShr,
            (7, Token::Shr) => Shr,
            (7, Token::Shl) => Shl,
            (8, Token::Add) => Add,
            (8, Token::Minus) => Sub,
            (9, Token::Mul) => Mul,
            (9, Token::Div) => Div,
            (9, Token::Mod) => Mod,
            _ => return None,
        };
        self.bump();
        Some(op)
    }

    /// Parses the left-associative binary level at `level`, recursing into
    /// tighter levels.
    fn parse_binary_expression(&mut self, level: usize) -> Result<Expression> {
        if level >= Self::BINARY_LEVEL_COUNT {
            return self.parse_unary_expression();
        }

        let start = self.token.span;
        let mut left = self.parse_binary_expression(level + 1)?;
        while let Some(op) = self.eat_binary_op_at(level) {
            let right = self.parse_binary_expression(level + 1)?;
            left = Expression::Binary(BinaryExpression {
                left: Box::new(left),
                right: Box::new(right),
                op,
                span: start + self.prev_token.span,
            });
        }
        Ok(left)
    }

    /// Parses a prefix unary expression or anything tighter.
    fn parse_unary_expression(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let op = match &self.token.token {
            Token::Not => Some(UnaryOperation::Not),
            Token::Minus => Some(UnaryOperation::Minus),
            Token::Add => Some(UnaryOperation::Plus),
            Token::BitNot => Some(UnaryOperation::BitNot),
            Token::Typeof => Some(UnaryOperation::Typeof),
            Token::Void => Some(UnaryOperation::Void),
            Token::Delete => Some(UnaryOperation::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary_expression()?;
            return Ok(Expression::Unary(UnaryExpression {
                operand: Box::new(operand),
                op,
                span: start + self.prev_token.span,
            }));
        }

        if let Some(op) = self.eat_update_op() {
            let operand = self.parse_unary_expression()?;
            return Ok(Expression::Update(UpdateExpression {
                operand: Box::new(operand),
                op,
                prefix: true,
                span: start + self.prev_token.span,
            }));
        }

        self.parse_postfix_expression()
    }

    fn eat_update_op(&mut self) -> Option<UpdateOperation> {
        if self.eat(&Token::Increment) {
            Some(UpdateOperation::Increment)
        } else if self.eat(&Token::Decrement) {
            Some(UpdateOperation::Decrement)
        } else {
            None
        }
    }

    /// Parses a call/member chain with an optional postfix update.
    fn parse_postfix_expression(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let mut expr = self.parse_call_member_expression()?;
        while let Some(op) = self.eat_update_op() {
            expr = Expression::Update(UpdateExpression {
                operand: Box::new(expr),
                op,
                prefix: false,
                span: start + self.prev_token.span,
            });
        }
        Ok(expr)
    }

    /// Parses a primary expression followed by any chain of member accesses
    /// and calls, handling `new` callees along the way.
    fn parse_call_member_expression(&mut self) -> Result<Expression> {
        let start = self.token.span;
        let mut expr = if self.check(&Token::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };

        loop {
            if self.eat(&Token::Dot) {
                let property = self.expect_property_name()?;
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property: MemberProperty::Identifier(property),
                    span: start + self.prev_token.span,
                });
            } else if self.eat(&Token::LeftSquare) {
                let key = self.parse_expression()?;
                self.expect(&Token::RightSquare)?;
                expr = Expression::Member(MemberExpression {
                    object: Box::new(expr),
                    property: MemberProperty::Computed(Box::new(key)),
                    span: start + self.prev_token.span,
                });
            } else if self.check(&Token::LeftParen) {
                let (arguments, _) = self.parse_paren_comma_list(|p| p.parse_assignment_expression())?;
                expr = Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments,
                    span: start + self.prev_token.span,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    /// Parses `new callee(args)`. The callee may contain member accesses but
    /// not calls; `new (f())()` needs its parentheses.
    fn parse_new_expression(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::New)?;
        let mut callee = self.parse_primary_expression()?;
        loop {
            if self.eat(&Token::Dot) {
                let property = self.expect_property_name()?;
                callee = Expression::Member(MemberExpression {
                    object: Box::new(callee),
                    property: MemberProperty::Identifier(property),
                    span: start + self.prev_token.span,
                });
            } else if self.eat(&Token::LeftSquare) {
                let key = self.parse_expression()?;
                self.expect(&Token::RightSquare)?;
                callee = Expression::Member(MemberExpression {
                    object: Box::new(callee),
                    property: MemberProperty::Computed(Box::new(key)),
                    span: start + self.prev_token.span,
                });
            } else {
                break;
            }
        }
        let arguments = if self.check(&Token::LeftParen) {
            self.parse_paren_comma_list(|p| p.parse_assignment_expression())?.0
        } else {
            Vec::new()
        };
        Ok(Expression::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span: start + self.prev_token.span,
        }))
    }

    /// Expects a property name after `.`: an identifier, or a keyword used
    /// as one (`obj.default` is legal source).
    fn expect_property_name(&mut self) -> Result<Identifier> {
        if let Some(keyword) = self.token.token.keyword_text() {
            let identifier = Identifier { name: keyword.to_string(), span: self.token.span };
            self.bump();
            return Ok(identifier);
        }
        self.expect_ident()
    }

    /// Parses a primary expression: a literal, an identifier, a grouped
    /// expression, an array or object literal, or a function expression.
    fn parse_primary_expression(&mut self) -> Result<Expression> {
        let span = self.token.span;
        let token = self.token.token.clone();
        match token {
            Token::Ident(name) => {
                self.bump();
                Ok(Expression::Identifier(Identifier { name, span }))
            }
            Token::Int(text) => {
                self.bump();
                Ok(Expression::Literal(Literal::Integer(text, span)))
            }
            Token::Float(text) => {
                self.bump();
                Ok(Expression::Literal(Literal::Fractional(text, span)))
            }
            Token::StaticString(value) => {
                self.bump();
                Ok(Expression::Literal(Literal::String(value, span)))
            }
            Token::Template(value) => {
                self.bump();
                Ok(Expression::Literal(Literal::Template(value, span)))
            }
            Token::Regex(text) => {
                self.bump();
                Ok(Expression::Literal(Literal::Regex(text, span)))
            }
            Token::True => {
                self.bump();
                Ok(Expression::Literal(Literal::Boolean(true, span)))
            }
            Token::False => {
                self.bump();
                Ok(Expression::Literal(Literal::Boolean(false, span)))
            }
            Token::Null => {
                self.bump();
                Ok(Expression::Literal(Literal::Null(span)))
            }
            Token::Undefined => {
                self.bump();
                Ok(Expression::Literal(Literal::Undefined(span)))
            }
            Token::LeftParen => {
                self.bump();
                let expression = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expression)
            }
            Token::LeftSquare => self.parse_array_literal(),
            Token::LeftCurly => self.parse_object_literal(),
            Token::Function => self.parse_function_expression(),
            _ => self.unexpected("an expression"),
        }
    }

    /// Parses an array literal. Holes become `undefined` elements.
    fn parse_array_literal(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::LeftSquare)?;
        let mut elements = Vec::new();
        loop {
            if self.eat(&Token::RightSquare) {
                break;
            }
            if self.check(&Token::Comma) {
                elements.push(Expression::Literal(Literal::Undefined(self.token.span)));
                self.bump();
                continue;
            }
            elements.push(self.parse_assignment_expression()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RightSquare)?;
                break;
            }
        }
        Ok(Expression::Array(ArrayExpression { elements, span: start + self.prev_token.span }))
    }

    /// Parses an object literal. Shorthand `{ a }` normalizes to `{ a: a }`.
    fn parse_object_literal(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::LeftCurly)?;
        let mut properties = Vec::new();
        while !self.check(&Token::RightCurly) {
            properties.push(self.parse_object_property()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RightCurly)?;
        Ok(Expression::Object(ObjectExpression { properties, span: start + self.prev_token.span }))
    }

    fn parse_object_property(&mut self) -> Result<ObjectProperty> {
        let start = self.token.span;
        let key = match self.token.token.clone() {
            Token::Ident(name) => {
                self.bump();
                PropertyKey::Identifier(Identifier { name, span: start })
            }
            Token::StaticString(value) => {
                self.bump();
                PropertyKey::String(value, start)
            }
            Token::Int(text) | Token::Float(text) => {
                self.bump();
                PropertyKey::Numeric(text, start)
            }
            Token::LeftSquare => {
                self.bump();
                let key = self.parse_assignment_expression()?;
                self.expect(&Token::RightSquare)?;
                PropertyKey::Computed(Box::new(key))
            }
            token => match token.keyword_text() {
                // Keywords are legal object keys, e.g. `{ default: 1 }`.
                Some(keyword) => {
                    self.bump();
                    PropertyKey::Identifier(Identifier { name: keyword.to_string(), span: start })
                }
                None => return self.unexpected("an object key"),
            },
        };

        let value = if self.eat(&Token::Colon) {
            self.parse_assignment_expression()?
        } else if let PropertyKey::Identifier(name) = &key {
            // Shorthand.
            Expression::Identifier(name.clone())
        } else {
            return self.unexpected("':'");
        };

        Ok(ObjectProperty { key, value, span: start + self.prev_token.span })
    }

    /// Parses an inline `function` expression.
    fn parse_function_expression(&mut self) -> Result<Expression> {
        let start = self.expect(&Token::Function)?;
        let name = self.eat_identifier();
        let (params, _) = self.parse_paren_comma_list(|p| p.expect_binding_ident())?;
        let body = self.parse_block()?;
        Ok(Expression::Function(FunctionExpression {
            name,
            params,
            body,
            span: start + self.prev_token.span,
        }))
    }
}
