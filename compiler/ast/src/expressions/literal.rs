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

use super::*;

/// A literal expression.
///
/// String and template literals store the cooked value; numeric literals keep
/// their source text so `0x2a` and `1e3` print back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// A string literal, e.g., `"foobar"`. The value is unescaped.
    String(String, Span),
    /// An integer literal, e.g., `42` or `0x2a`.
    Integer(String, Span),
    /// A fractional literal, e.g., `0.5` or `1e-3`.
    Fractional(String, Span),
    /// A boolean literal, either `true` or `false`.
    Boolean(bool, Span),
    /// The `null` literal.
    Null(Span),
    /// The `undefined` literal.
    Undefined(Span),
    /// A regular expression literal kept verbatim, e.g., `/ab+c/gi`.
    Regex(String, Span),
    /// A template literal without substitutions. The value is unescaped.
    Template(String, Span),
}

impl Literal {
    /// The numeric value of an integer or fractional literal, if this is one.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Literal::Integer(text, _) => parse_integer(text),
            Literal::Fractional(text, _) => text.parse().ok(),
            _ => None,
        }
    }
}

/// Parses the source text of an integer literal, including radix prefixes.
pub fn parse_integer(text: &str) -> Option<f64> {
    let radix = |prefix: &str, radix: u32| {
        u64::from_str_radix(text.trim_start_matches(prefix), radix).ok().map(|n| n as f64)
    };
    if text.starts_with("0x") || text.starts_with("0X") {
        radix(&text[..2], 16)
    } else if text.starts_with("0o") || text.starts_with("0O") {
        radix(&text[..2], 8)
    } else if text.starts_with("0b") || text.starts_with("0B") {
        radix(&text[..2], 2)
    } else {
        // Decimal, possibly with an exponent such as `1e3`.
        text.parse().ok()
    }
}

/// Returns the double-quoted source form of a string value, escaping exactly
/// what the tokenizer unescapes.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000B}' => out.push_str("\\v"),
            '\u{000C}' => out.push_str("\\f"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Returns the backtick-quoted source form of a template value.
fn quote_template(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${");
    format!("`{escaped}`")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Literal::*;
        match self {
            String(value, _) => write!(f, "{}", quote_string(value)),
            Integer(text, _) => write!(f, "{text}"),
            Fractional(text, _) => write!(f, "{text}"),
            Boolean(value, _) => write!(f, "{value}"),
            Null(_) => write!(f, "null"),
            Undefined(_) => write!(f, "undefined"),
            Regex(text, _) => write!(f, "{text}"),
            Template(value, _) => write!(f, "{}", quote_template(value)),
        }
    }
}

impl Node for Literal {
    fn span(&self) -> Span {
        use Literal::*;
        match self {
            String(_, span)
            | Integer(_, span)
            | Fractional(_, span)
            | Boolean(_, span)
            | Null(span)
            | Undefined(span)
            | Regex(_, span)
            | Template(_, span) => *span,
        }
    }

    fn set_span(&mut self, new_span: Span) {
        use Literal::*;
        match self {
            String(_, span)
            | Integer(_, span)
            | Fractional(_, span)
            | Boolean(_, span)
            | Null(span)
            | Undefined(span)
            | Regex(_, span)
            | Template(_, span) => *span = new_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_escapes_control_characters() {
        assert_eq!(quote_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote_string("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn integer_parsing_handles_radix_prefixes() {
        assert_eq!(parse_integer("42"), Some(42.0));
        assert_eq!(parse_integer("0x2a"), Some(42.0));
        assert_eq!(parse_integer("0b101"), Some(5.0));
        assert_eq!(parse_integer("1e3"), Some(1000.0));
    }
}
