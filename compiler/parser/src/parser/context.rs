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

use crate::tokenizer::{SpannedToken, Token};

use dejs_ast::Identifier;
use dejs_errors::{ParserError, Result};
use dejs_span::Span;

use std::fmt::Display;
use std::mem;

/// Stores a program in tokenized format plus additional context.
/// May be converted into a [`dejs_ast::Program`] AST by parsing all tokens.
pub struct ParserContext {
    /// All un-bumped tokens.
    tokens: Vec<SpannedToken>,
    /// The current token, i.e., if `p.tokens = ['3', *, '4']`,
    /// then after a `p.bump()`, we'll have `p.token = '3'`.
    pub(crate) token: SpannedToken,
    /// The previous token, i.e., if `p.tokens = ['3', *, '4']`,
    /// then after two `p.bump()`s, we'll have `p.token = '*'` and `p.prev_token = '3'`.
    pub(crate) prev_token: SpannedToken,
}

impl ParserContext {
    /// Returns a new [`ParserContext`] type given a vector of tokens.
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        // Strip out comments and whitespace.
        tokens.retain(|x| {
            !matches!(x.token, Token::WhiteSpace | Token::CommentLine(_) | Token::CommentBlock(_))
        });
        // For performance we reverse so that we get cheap `.pop()`s.
        tokens.reverse();

        let token = SpannedToken::dummy();
        let mut p = Self { prev_token: token.clone(), token, tokens };
        p.bump();
        p
    }

    /// Advances the parser cursor by one token.
    pub fn bump(&mut self) {
        // Extract the next token, or `Eof` if there was none.
        let next_token = self
            .tokens
            .pop()
            .unwrap_or_else(|| SpannedToken { token: Token::Eof, span: self.token.span });

        // Set the new token.
        self.prev_token = mem::replace(&mut self.token, next_token);
    }

    /// Checks whether the current token is `token`.
    pub fn check(&self, tok: &Token) -> bool {
        &self.token.token == tok
    }

    /// Removes the next token if it matches and returns `true`.
    pub fn eat(&mut self, token: &Token) -> bool {
        self.check(token) && {
            self.bump();
            true
        }
    }

    /// Look-ahead `dist` tokens of `self.token` and get access to that token there.
    /// When `dist == 0` then the current token is looked at.
    pub fn look_ahead<R>(&self, dist: usize, looker: impl FnOnce(&Token) -> R) -> R {
        if dist == 0 {
            return looker(&self.token.token);
        }

        // The token vector is reversed, so `dist` counts from its end.
        match self.tokens.len().checked_sub(dist) {
            Some(idx) => looker(self.tokens.get(idx).map_or(&Token::Eof, |spanned| &spanned.token)),
            None => looker(&Token::Eof),
        }
    }

    /// Returns true if the next token exists.
    pub fn has_next(&self) -> bool {
        !matches!(self.token.token, Token::Eof)
    }

    /// Eats the next token if it is an identifier and returns it.
    pub fn eat_identifier(&mut self) -> Option<Identifier> {
        if let Token::Ident(name) = &self.token.token {
            let identifier = Identifier { name: name.clone(), span: self.token.span };
            self.bump();
            return Some(identifier);
        }
        None
    }

    /// Expects an [`Identifier`], or errors.
    pub fn expect_ident(&mut self) -> Result<Identifier> {
        self.eat_identifier().ok_or_else(|| self.unexpected_error("a name"))
    }

    /// Expects a binding name: an identifier that is not a reserved word.
    pub fn expect_binding_ident(&mut self) -> Result<Identifier> {
        if let Some(keyword) = self.token.token.keyword_text() {
            return Err(ParserError::ReservedBindingName {
                keyword: keyword.to_string(),
                span: self.token.span,
            }
            .into());
        }
        self.expect_ident()
    }

    /// Eats any of the given `tokens`, returning `true` if anything was eaten.
    pub fn eat_any(&mut self, tokens: &[Token]) -> bool {
        tokens.iter().any(|x| self.check(x)) && {
            self.bump();
            true
        }
    }

    /// Returns an unexpected-token error at the current token.
    pub(crate) fn unexpected_error(&self, expected: impl Display) -> dejs_errors::DejsError {
        ParserError::Unexpected {
            found: self.token.token.to_string(),
            expected: expected.to_string(),
            span: self.token.span,
        }
        .into()
    }

    /// Returns an unexpected-token error result at the current token.
    pub fn unexpected<T>(&self, expected: impl Display) -> Result<T> {
        Err(self.unexpected_error(expected))
    }

    /// Eats the expected `token`, or errors.
    pub fn expect(&mut self, token: &Token) -> Result<Span> {
        if self.eat(token) {
            Ok(self.prev_token.span)
        } else {
            self.unexpected(format!("'{token}'"))
        }
    }

    /// Parses a list of `T`s using `inner`.
    /// The opening and closing delimiters are `open` and `close`,
    /// and elements in the list are separated by `sep`. Trailing separators
    /// are permitted.
    pub(super) fn parse_list<T>(
        &mut self,
        open: Token,
        close: Token,
        sep: Token,
        mut inner: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<(Vec<T>, Span)> {
        let mut list = Vec::new();

        let open_span = self.expect(&open)?;
        while !self.check(&close) {
            list.push(inner(self)?);
            if !self.eat(&sep) {
                break;
            }
        }
        let span = open_span + self.expect(&close)?;

        Ok((list, span))
    }

    /// Parse a list separated by `,` and delimited by parens.
    pub(super) fn parse_paren_comma_list<T>(
        &mut self,
        f: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<(Vec<T>, Span)> {
        self.parse_list(Token::LeftParen, Token::RightParen, Token::Comma, f)
    }
}
