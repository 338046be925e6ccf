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

use dejs_span::Span;

use thiserror::Error;

/// Errors raised while tokenizing or parsing source text.
///
/// All of these are fatal: the pipeline never rewrites source it could not
/// fully parse.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unexpected character `{character}` at byte {offset}")]
    UnexpectedCharacter { character: char, offset: u32 },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("string literal starting at byte {offset} is not closed")]
    UnclosedString { offset: u32 },

    #[error("template literal starting at byte {offset} is not closed")]
    UnclosedTemplate { offset: u32 },

    #[error("template substitutions are not supported (byte {offset})")]
    TemplateSubstitution { offset: u32 },

    #[error("regular expression literal starting at byte {offset} is not closed")]
    UnclosedRegex { offset: u32 },

    #[error("block comment starting at byte {offset} does not close before end of file")]
    UnclosedBlockComment { offset: u32 },

    #[error("invalid numeric literal `{text}` at byte {offset}")]
    InvalidNumber { text: String, offset: u32 },

    #[error("expected {expected}, found `{found}` at {span}")]
    Unexpected { found: String, expected: String, span: Span },

    #[error("`{keyword}` is reserved and cannot be used as a binding name at {span}")]
    ReservedBindingName { keyword: String, span: Span },

    #[error("invalid assignment target at {span}")]
    InvalidAssignmentTarget { span: Span },

    #[error("`for` statement header at {span} is malformed")]
    MalformedForHeader { span: Span },

    #[error("`try` statement at {span} has neither a catch clause nor a finally block")]
    TryWithoutHandler { span: Span },
}
