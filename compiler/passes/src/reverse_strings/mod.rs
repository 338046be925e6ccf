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

//! Textual normalization of the reversed-string idiom.
//!
//! Obfuscators like to hide string constants as
//! `"dlrow olleh".split("").reverse().join("")`. The idiom is trivially
//! provable, and folding it before parsing lets the call-site extractor see
//! a literal argument where it would otherwise see a method chain. This is
//! the only component that touches raw source text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static REVERSED_STRING_IDIOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#,
        r#"\.split\((?:""|'')\)\.reverse\(\)\.join\((?:""|'')\)"#,
    ))
    .expect("the idiom pattern is well-formed")
});

/// Replaces every occurrence of the reversed-string idiom with the reversed
/// literal. Applying the normalization twice equals applying it once: the
/// output contains no `.split("")` chains on string literals.
pub fn normalize_reversed_strings(source: &str) -> Cow<'_, str> {
    REVERSED_STRING_IDIOM.replace_all(source, |captures: &Captures<'_>| {
        let (quote, chars) = match (captures.get(1), captures.get(2)) {
            (Some(chars), _) => ('"', chars.as_str()),
            (_, Some(chars)) => ('\'', chars.as_str()),
            _ => unreachable!("one alternative always matches"),
        };
        format!("{quote}{}{quote}", reverse_escaped(chars))
    })
}

/// Reverses the characters of a raw (still escaped) string body, keeping
/// each escape sequence together as one unit.
fn reverse_escaped(raw: &str) -> String {
    let mut units: Vec<&str> = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        let unit_len = if rest.starts_with('\\') {
            match rest[1..].chars().next() {
                // `\xHH`
                Some('x') => 4.min(rest.len()),
                // `\uHHHH`; the braced form keeps its whole body.
                Some('u') => match rest[2..].find('}') {
                    Some(close) if rest[2..].starts_with('{') => close + 3,
                    _ => 6.min(rest.len()),
                },
                Some(c) => 1 + c.len_utf8(),
                None => 1,
            }
        } else {
            rest.chars().next().map_or(1, char::len_utf8)
        };
        let (unit, tail) = rest.split_at(unit_len.min(rest.len()));
        units.push(unit);
        rest = tail;
    }
    units.reverse();
    units.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_the_plain_idiom() {
        let source = r#"var s = "dlrow olleh".split("").reverse().join("");"#;
        assert_eq!(normalize_reversed_strings(source), r#"var s = "hello world";"#);
    }

    #[test]
    fn keeps_escape_sequences_intact() {
        let source = r#"var s = "ba\n".split("").reverse().join("");"#;
        assert_eq!(normalize_reversed_strings(source), r#"var s = "\nab";"#);
    }

    #[test]
    fn handles_single_quoted_subjects() {
        let source = r#"var s = 'cba'.split('').reverse().join('');"#;
        assert_eq!(normalize_reversed_strings(source), r#"var s = 'abc';"#);
    }

    #[test]
    fn is_idempotent() {
        let source = r#"f("zyx".split("").reverse().join(""), "untouched");"#;
        let once = normalize_reversed_strings(source).into_owned();
        let twice = normalize_reversed_strings(&once).into_owned();
        assert_eq!(once, r#"f("xyz", "untouched");"#);
        assert_eq!(once, twice);
    }

    #[test]
    fn leaves_other_chains_alone() {
        let source = r#"var s = name.split("").reverse().join("");"#;
        assert_eq!(normalize_reversed_strings(source), source);
    }
}
