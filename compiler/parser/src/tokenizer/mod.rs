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

//! The tokenizer for the JavaScript subset.
//!
//! Tokens are produced by repeatedly calling [`Token::eat`] on the remaining
//! input. Whether a `/` begins a regular expression or a division depends on
//! the previous significant token, so the loop threads that one bit of
//! context through.

pub mod lexer;
pub use lexer::*;

pub mod token;
pub use token::*;

use dejs_errors::Result;
use dejs_span::Span;

/// Tokenizes the whole source into spanned tokens, comments and whitespace
/// included. The parser strips those before parsing.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>> {
    let mut tokens = Vec::new();
    let mut pos: u32 = 0;
    let mut regex_allowed = true;

    while (pos as usize) < source.len() {
        let (eaten, token) = Token::eat(&source[pos as usize..], pos, regex_allowed)?;
        let span = Span::new(pos, pos + eaten as u32);
        pos += eaten as u32;

        if !matches!(token, Token::WhiteSpace | Token::CommentLine(_) | Token::CommentBlock(_)) {
            regex_allowed = token.regex_may_follow();
        }
        tokens.push(SpannedToken { token, span });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenizing should succeed")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !matches!(t, Token::WhiteSpace | Token::CommentLine(_) | Token::CommentBlock(_)))
            .collect()
    }

    #[test]
    fn strings_unescape() {
        assert_eq!(token_kinds(r#""a\n\"b""#), vec![Token::StaticString("a\n\"b".into())]);
        assert_eq!(token_kinds(r"'it\'s'"), vec![Token::StaticString("it's".into())]);
        assert_eq!(token_kinds(r#""\x41B""#), vec![Token::StaticString("AB".into())]);
    }

    #[test]
    fn numbers_split_by_kind() {
        assert_eq!(
            token_kinds("42 0x2a 1.5 .5 1e3"),
            vec![
                Token::Int("42".into()),
                Token::Int("0x2a".into()),
                Token::Float("1.5".into()),
                Token::Float(".5".into()),
                Token::Float("1e3".into()),
            ]
        );
    }

    #[test]
    fn regex_only_in_operand_position() {
        // After `=` a slash starts a regex, after an identifier it divides.
        assert_eq!(
            token_kinds("x = /ab/g"),
            vec![Token::Ident("x".into()), Token::Assign, Token::Regex("/ab/g".into())]
        );
        assert_eq!(
            token_kinds("a / b"),
            vec![Token::Ident("a".into()), Token::Div, Token::Ident("b".into())]
        );
    }

    #[test]
    fn operators_take_longest_match() {
        assert_eq!(
            token_kinds(">>>= === !== =>"),
            vec![Token::UnsignedShrAssign, Token::StrictEq, Token::StrictNotEq, Token::FatArrow]
        );
    }

    #[test]
    fn spans_use_byte_offsets() {
        let tokens = tokenize("ab  cd").expect("tokenizing should succeed");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens.last().map(|t| t.span), Some(Span::new(4, 6)));
    }
}
