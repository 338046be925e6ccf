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

use dejs_ast::{Program, Statement};
use dejs_errors::Result;
use dejs_span::Span;

impl ParserContext {
    /// Parses the whole token stream into a [`Program`].
    pub(super) fn parse_program(&mut self) -> Result<Program> {
        let start = self.token.span;
        let mut statements: Vec<Statement> = Vec::new();
        while self.has_next() {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        let span = if statements.is_empty() { Span::dummy() } else { start + self.prev_token.span };
        Ok(Program { statements, span })
    }
}
