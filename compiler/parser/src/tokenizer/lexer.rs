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

use crate::tokenizer::Token;

use dejs_errors::{ParserError, Result};
use dejs_span::Span;

use serde::{Deserialize, Serialize};
use std::{fmt, iter::Peekable, str::Chars};

/// A cursor over the remaining input that counts consumed bytes, so token
/// spans stay correct in the presence of multi-byte characters.
struct Scan<'a> {
    chars: Peekable<Chars<'a>>,
    consumed: usize,
}

impl<'a> Scan<'a> {
    fn new(input: &'a str) -> Self {
        Self { chars: input.chars().peekable(), consumed: 0 }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.consumed += c.len_utf8();
        Some(c)
    }

    fn next_if_eq(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    fn next_while(&mut self, pred: impl Fn(char) -> bool, out: &mut String) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.next();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl Token {
    /// Returns a tuple [(token length in bytes, token)] if the next token can
    /// be eaten, otherwise errors. `at` is the global byte offset of the
    /// token start, used in error reports. `regex_allowed` tells a leading
    /// `/` apart from a division operator.
    pub(crate) fn eat(input: &str, at: u32, regex_allowed: bool) -> Result<(usize, Token)> {
        let mut s = Scan::new(input);

        // Consumes a single character token.
        let single = |s: &mut Scan<'_>, token| {
            s.next();
            Ok((s.consumed, token))
        };
        // Consumes a character followed by `on` with `then` if found or `els` otherwise.
        let followed_by = |s: &mut Scan<'_>, on, then, els| {
            s.next();
            let token = if s.next_if_eq(on) { then } else { els };
            Ok((s.consumed, token))
        };

        match s.peek().ok_or(ParserError::UnexpectedEof)? {
            c if c.is_whitespace() => return single(&mut s, Token::WhiteSpace),
            '"' => return Self::eat_string(&mut s, '"', at),
            '\'' => return Self::eat_string(&mut s, '\'', at),
            '`' => return Self::eat_template(&mut s, at),
            c if c.is_ascii_digit() => return Self::eat_number(&mut s, at),
            '(' => return single(&mut s, Token::LeftParen),
            ')' => return single(&mut s, Token::RightParen),
            '[' => return single(&mut s, Token::LeftSquare),
            ']' => return single(&mut s, Token::RightSquare),
            '{' => return single(&mut s, Token::LeftCurly),
            '}' => return single(&mut s, Token::RightCurly),
            ',' => return single(&mut s, Token::Comma),
            ';' => return single(&mut s, Token::Semicolon),
            ':' => return single(&mut s, Token::Colon),
            '?' => return single(&mut s, Token::Question),
            '~' => return single(&mut s, Token::BitNot),
            '^' => return followed_by(&mut s, '=', Token::BitXorAssign, Token::BitXor),
            '%' => return followed_by(&mut s, '=', Token::ModAssign, Token::Mod),
            '*' => return followed_by(&mut s, '=', Token::MulAssign, Token::Mul),
            '.' => {
                s.next();
                if s.peek().is_some_and(|c| c.is_ascii_digit()) {
                    // A fractional literal like `.5`.
                    let mut text = String::from(".");
                    s.next_while(|c| c.is_ascii_digit(), &mut text);
                    Self::eat_exponent(&mut s, &mut text, at)?;
                    return Ok((s.consumed, Token::Float(text)));
                }
                return Ok((s.consumed, Token::Dot));
            }
            '=' => {
                s.next();
                let token = if s.next_if_eq('=') {
                    if s.next_if_eq('=') { Token::StrictEq } else { Token::Eq }
                } else if s.next_if_eq('>') {
                    Token::FatArrow
                } else {
                    Token::Assign
                };
                return Ok((s.consumed, token));
            }
            '!' => {
                s.next();
                let token = if s.next_if_eq('=') {
                    if s.next_if_eq('=') { Token::StrictNotEq } else { Token::NotEq }
                } else {
                    Token::Not
                };
                return Ok((s.consumed, token));
            }
            '<' => {
                s.next();
                let token = if s.next_if_eq('<') {
                    if s.next_if_eq('=') { Token::ShlAssign } else { Token::Shl }
                } else if s.next_if_eq('=') {
                    Token::LtEq
                } else {
                    Token::Lt
                };
                return Ok((s.consumed, token));
            }
            '>' => {
                s.next();
                let token = if s.next_if_eq('>') {
                    if s.next_if_eq('>') {
                        if s.next_if_eq('=') { Token::UnsignedShrAssign } else { Token::UnsignedShr }
                    } else if s.next_if_eq('=') {
                        Token::ShrAssign
                    } else {
                        Token::Shr
                    }
                } else if s.next_if_eq('=') {
                    Token::GtEq
                } else {
                    Token::Gt
                };
                return Ok((s.consumed, token));
            }
            '+' => {
                s.next();
                let token = if s.next_if_eq('+') {
                    Token::Increment
                } else if s.next_if_eq('=') {
                    Token::AddAssign
                } else {
                    Token::Add
                };
                return Ok((s.consumed, token));
            }
            '-' => {
                s.next();
                let token = if s.next_if_eq('-') {
                    Token::Decrement
                } else if s.next_if_eq('=') {
                    Token::SubAssign
                } else {
                    Token::Minus
                };
                return Ok((s.consumed, token));
            }
            '&' => {
                s.next();
                let token = if s.next_if_eq('&') {
                    Token::And
                } else if s.next_if_eq('=') {
                    Token::BitAndAssign
                } else {
                    Token::BitAnd
                };
                return Ok((s.consumed, token));
            }
            '|' => {
                s.next();
                let token = if s.next_if_eq('|') {
                    Token::Or
                } else if s.next_if_eq('=') {
                    Token::BitOrAssign
                } else {
                    Token::BitOr
                };
                return Ok((s.consumed, token));
            }
            '/' => {
                s.next();
                if s.next_if_eq('/') {
                    let mut comment = String::from("//");
                    s.next_while(|c| c != '\n', &mut comment);
                    return Ok((s.consumed, Token::CommentLine(comment)));
                }
                if s.next_if_eq('*') {
                    let mut comment = String::from("/*");
                    let mut ended = false;
                    while let Some(c) = s.next() {
                        comment.push(c);
                        if c == '*' && s.next_if_eq('/') {
                            comment.push('/');
                            ended = true;
                            break;
                        }
                    }
                    if !ended {
                        return Err(ParserError::UnclosedBlockComment { offset: at }.into());
                    }
                    return Ok((s.consumed, Token::CommentBlock(comment)));
                }
                if regex_allowed {
                    return Self::eat_regex(&mut s, at);
                }
                let token = if s.next_if_eq('=') { Token::DivAssign } else { Token::Div };
                return Ok((s.consumed, token));
            }
            c if is_ident_start(c) => {
                let mut ident = String::new();
                s.next_while(is_ident_continue, &mut ident);
                let token = Token::keyword(&ident).unwrap_or(Token::Ident(ident));
                return Ok((s.consumed, token));
            }
            c => Err(ParserError::UnexpectedCharacter { character: c, offset: at }.into()),
        }
    }

    /// Eats a string literal delimited by `quote`, unescaping as it goes.
    fn eat_string(s: &mut Scan<'_>, quote: char, at: u32) -> Result<(usize, Token)> {
        s.next();
        let mut value = String::new();
        loop {
            let Some(c) = s.next() else {
                return Err(ParserError::UnclosedString { offset: at }.into());
            };
            match c {
                c if c == quote => return Ok((s.consumed, Token::StaticString(value))),
                '\n' => return Err(ParserError::UnclosedString { offset: at }.into()),
                '\\' => {
                    let Some(escaped) = s.next() else {
                        return Err(ParserError::UnclosedString { offset: at }.into());
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'b' => value.push('\u{0008}'),
                        'v' => value.push('\u{000B}'),
                        'f' => value.push('\u{000C}'),
                        '0' => value.push('\0'),
                        'x' => value.push(Self::eat_hex_escape(s, 2, at)?),
                        'u' => value.push(Self::eat_unicode_escape(s, at)?),
                        // Line continuations disappear from the value.
                        '\n' => {}
                        '\r' => {
                            s.next_if_eq('\n');
                        }
                        other => value.push(other),
                    }
                }
                c => value.push(c),
            }
        }
    }

    /// Eats exactly `digits` hex digits and returns the encoded character.
    fn eat_hex_escape(s: &mut Scan<'_>, digits: usize, at: u32) -> Result<char> {
        let mut hex = String::new();
        for _ in 0..digits {
            match s.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(ParserError::UnclosedString { offset: at }.into()),
            }
        }
        let code = u32::from_str_radix(&hex, 16).expect("hex digits were checked");
        char::from_u32(code).ok_or_else(|| ParserError::UnclosedString { offset: at }.into())
    }

    /// Eats the body of a `\u` escape, either `\uXXXX` or `\u{…}`.
    fn eat_unicode_escape(s: &mut Scan<'_>, at: u32) -> Result<char> {
        if s.next_if_eq('{') {
            let mut hex = String::new();
            loop {
                match s.next() {
                    Some('}') => break,
                    Some(c) if c.is_ascii_hexdigit() && hex.len() < 6 => hex.push(c),
                    _ => return Err(ParserError::UnclosedString { offset: at }.into()),
                }
            }
            let code =
                u32::from_str_radix(&hex, 16).map_err(|_| ParserError::UnclosedString { offset: at })?;
            char::from_u32(code).ok_or_else(|| ParserError::UnclosedString { offset: at }.into())
        } else {
            Self::eat_hex_escape(s, 4, at)
        }
    }

    /// Eats a template literal. Substitutions are outside the subset.
    fn eat_template(s: &mut Scan<'_>, at: u32) -> Result<(usize, Token)> {
        s.next();
        let mut value = String::new();
        loop {
            let Some(c) = s.next() else {
                return Err(ParserError::UnclosedTemplate { offset: at }.into());
            };
            match c {
                '`' => return Ok((s.consumed, Token::Template(value))),
                '$' if s.peek() == Some('{') => {
                    return Err(ParserError::TemplateSubstitution { offset: at + s.consumed as u32 }.into());
                }
                '\\' => match s.next() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('`') => value.push('`'),
                    Some('$') => value.push('$'),
                    Some('\\') => value.push('\\'),
                    Some(other) => value.push(other),
                    None => return Err(ParserError::UnclosedTemplate { offset: at }.into()),
                },
                c => value.push(c),
            }
        }
    }

    /// Eats a numeric literal: decimal, fractional, exponent or radix forms.
    fn eat_number(s: &mut Scan<'_>, at: u32) -> Result<(usize, Token)> {
        let mut text = String::new();
        let first = s.next().expect("a digit was peeked");
        text.push(first);

        if first == '0'
            && let Some(radix) = s.peek().filter(|c| matches!(c, 'x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            text.push(radix);
            s.next();
            let before = text.len();
            s.next_while(|c| c.is_ascii_alphanumeric(), &mut text);
            let valid = match radix {
                'x' | 'X' => text[before..].chars().all(|c| c.is_ascii_hexdigit()),
                'o' | 'O' => text[before..].chars().all(|c| ('0'..='7').contains(&c)),
                _ => text[before..].chars().all(|c| c == '0' || c == '1'),
            };
            if text.len() == before || !valid {
                return Err(ParserError::InvalidNumber { text, offset: at }.into());
            }
            return Ok((s.consumed, Token::Int(text)));
        }

        s.next_while(|c| c.is_ascii_digit(), &mut text);
        let mut fractional = false;
        if s.peek() == Some('.') {
            fractional = true;
            text.push('.');
            s.next();
            s.next_while(|c| c.is_ascii_digit(), &mut text);
        }
        fractional |= Self::eat_exponent(s, &mut text, at)?;

        let token = if fractional { Token::Float(text) } else { Token::Int(text) };
        Ok((s.consumed, token))
    }

    /// Eats an optional exponent suffix, reporting whether one was present.
    fn eat_exponent(s: &mut Scan<'_>, text: &mut String, at: u32) -> Result<bool> {
        if !matches!(s.peek(), Some('e' | 'E')) {
            return Ok(false);
        }
        text.push(s.next().expect("the exponent marker was peeked"));
        if let Some(sign) = s.peek().filter(|c| matches!(c, '+' | '-')) {
            text.push(sign);
            s.next();
        }
        let before = text.len();
        s.next_while(|c| c.is_ascii_digit(), text);
        if text.len() == before {
            return Err(ParserError::InvalidNumber { text: text.clone(), offset: at }.into());
        }
        Ok(true)
    }

    /// Eats a regular expression literal, kept verbatim with its flags.
    fn eat_regex(s: &mut Scan<'_>, at: u32) -> Result<(usize, Token)> {
        let mut text = String::from("/");
        let mut in_class = false;
        loop {
            let Some(c) = s.next() else {
                return Err(ParserError::UnclosedRegex { offset: at }.into());
            };
            match c {
                '\n' => return Err(ParserError::UnclosedRegex { offset: at }.into()),
                '\\' => {
                    text.push(c);
                    let Some(escaped) = s.next() else {
                        return Err(ParserError::UnclosedRegex { offset: at }.into());
                    };
                    text.push(escaped);
                }
                '[' => {
                    in_class = true;
                    text.push(c);
                }
                ']' => {
                    in_class = false;
                    text.push(c);
                }
                '/' if !in_class => {
                    text.push(c);
                    s.next_while(|c| c.is_ascii_alphabetic(), &mut text);
                    return Ok((s.consumed, Token::Regex(text)));
                }
                c => text.push(c),
            }
        }
    }
}

/// A token paired with the byte range it occupies in the source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    /// Returns a dummy token at a dummy span.
    pub const fn dummy() -> Self {
        Self { token: Token::Question, span: Span::dummy() }
    }
}

impl fmt::Display for SpannedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ {}", self.token, self.span)
    }
}
