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

//! The parser for the JavaScript subset dejs rewrites.
//!
//! Parsing is permissive: every source-level extension the subset knows is
//! enabled, statement terminators follow automatic-semicolon rules, and
//! keywords are accepted wherever real-world bundles use them as names.
//! Parse failure is fatal to the pipeline; the deobfuscator never rewrites
//! source it could not fully parse.

pub mod tokenizer;
pub use tokenizer::*;

pub mod parser;
pub use parser::*;

use dejs_ast::Ast;
use dejs_errors::Result;

/// Creates a new AST from a given file of source text.
pub fn parse_ast(source: &str) -> Result<Ast> {
    Ok(Ast::new(parser::parse(tokenizer::tokenize(source)?)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses, prints, re-parses, and checks the printed forms agree.
    fn round_trip(source: &str) -> String {
        let first = parse_ast(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
        let printed = first.to_string();
        let second = parse_ast(&printed).unwrap_or_else(|e| panic!("reparse failed for {printed:?}: {e}"));
        assert_eq!(printed, second.to_string(), "printing is not a fixed point for {source:?}");
        printed
    }

    #[test]
    fn round_trips_declarations_and_calls() {
        let printed = round_trip("var x = f123(1, 2, 3, 4);");
        assert_eq!(printed, "var x = f123(1, 2, 3, 4);\n");
    }

    #[test]
    fn round_trips_function_declaration() {
        let printed = round_trip("function f(a,b){return a+b;}");
        assert_eq!(printed, "function f(a, b) {\n    return a + b;\n}\n");
    }

    #[test]
    fn keeps_operator_precedence_without_source_parens() {
        assert_eq!(round_trip("var x = (1 + 2) * 3;"), "var x = (1 + 2) * 3;\n");
        assert_eq!(round_trip("var y = 1 + 2 * 3;"), "var y = 1 + 2 * 3;\n");
        assert_eq!(round_trip("var z = 1 + (2 * 3);"), "var z = 1 + 2 * 3;\n");
    }

    #[test]
    fn parses_iife_with_wrapping_parens() {
        let printed = round_trip("(function(){ f2(3); })();");
        assert_eq!(printed, "(function () {\n    f2(3);\n})();\n");
    }

    #[test]
    fn parses_member_calls_with_keyword_properties() {
        let printed = round_trip("obj.default(1, 2);");
        assert_eq!(printed, "obj.default(1, 2);\n");
    }

    #[test]
    fn parses_control_flow() {
        round_trip("do { f(); } while (x < 10);");
        round_trip("try { g(); } catch (e) { h(e); } finally { k(); }");
        round_trip("for (var i = 0; i < 10; i++) { f(i); }");
        round_trip("for (var k in obj) { f(k); }");
        round_trip("switch (x) { case 1: f(); break; default: g(); }");
    }

    #[test]
    fn parses_arrow_functions() {
        assert_eq!(round_trip("var f = (a, b) => a + b;"), "var f = (a, b) => a + b;\n");
        assert_eq!(round_trip("var g = x => x * 2;"), "var g = (x) => x * 2;\n");
    }

    #[test]
    fn negated_literals_and_nested_unary() {
        assert_eq!(round_trip("f(-1, - -2);"), "f(-1, -(-2));\n");
    }

    #[test]
    fn string_quotes_normalize_to_double() {
        assert_eq!(round_trip("var s = 'a\"b';"), "var s = \"a\\\"b\";\n");
    }

    #[test]
    fn statement_level_sequences_keep_their_shape() {
        assert_eq!(round_trip("a = 1, b = 2;"), "a = 1, b = 2;\n");
    }

    #[test]
    fn rejects_unclosed_string() {
        assert!(parse_ast("var s = \"abc").is_err());
    }

    #[test]
    fn rejects_stray_operator() {
        assert!(parse_ast("var x = * 2;").is_err());
    }

    #[test]
    fn reparse_matches_structure() {
        let source = "function f(a) { return a ? f(a - 1) : 0; }\nvar out = f(3);\n";
        let first = parse_ast(source).expect("parse should succeed");
        let second = parse_ast(&first.to_string()).expect("reparse should succeed");
        // Spans differ between the two trees, so compare printed forms.
        assert_eq!(first.to_string(), second.to_string());
    }
}
