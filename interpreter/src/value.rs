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

use crate::scope::ScopeRef;

use dejs_ast::{ArrowBody, Block, Identifier};

use indexmap::IndexMap;
use std::{cell::RefCell, fmt, rc::Rc};

/// A runtime value of the sandboxed subset.
///
/// Arrays and objects are reference values; cloning a `Value` clones the
/// handle, matching the source language.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<String>),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    Function(Rc<Closure>),
    Builtin(Builtin),
}

/// The body of a user function: a braced block or an arrow expression.
#[derive(Clone)]
pub enum FunctionBody {
    Block(Block),
    Expression(dejs_ast::Expression),
}

/// A user function together with its captured scope.
pub struct Closure {
    pub name: Option<String>,
    pub params: Vec<Identifier>,
    pub body: FunctionBody,
    pub scope: ScopeRef,
}

impl Closure {
    pub(crate) fn from_arrow(params: Vec<Identifier>, body: ArrowBody, scope: ScopeRef) -> Self {
        let body = match body {
            ArrowBody::Block(block) => FunctionBody::Block(block),
            ArrowBody::Expression(expression) => FunctionBody::Expression(*expression),
        };
        Self { name: None, params, body, scope }
    }
}

/// A host function. Receives the interpreter (for recording hooks and
/// resource accounting), the `this` value, and the arguments.
#[derive(Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub call: fn(&mut crate::Interpreter, Value, &[Value]) -> crate::EvalResult<Value>,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::Str(Rc::new(value.into()))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object(properties: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(properties)))
    }

    /// The `typeof` string of the value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            // `typeof null` is "object", a quirk the subset preserves.
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) | Value::Builtin(_) => "function",
        }
    }

    /// Boolean coercion.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Builtin(_) => true,
        }
    }

    /// Numeric coercion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
                    u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64)
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Array(elements) => match elements.borrow().as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) | Value::Function(_) | Value::Builtin(_) => f64::NAN,
        }
    }

    /// The 32-bit signed integer coercion used by the bitwise operators.
    pub fn to_int32(&self) -> i32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n as i64 as i32
    }

    /// The 32-bit unsigned integer coercion used by `>>>`.
    pub fn to_uint32(&self) -> u32 {
        self.to_int32() as u32
    }

    /// String coercion.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Str(s) => s.as_ref().clone(),
            Value::Array(elements) => {
                let elements = elements.borrow();
                elements
                    .iter()
                    .map(|element| match element {
                        Value::Undefined | Value::Null => String::new(),
                        element => element.to_display_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(closure) => match &closure.name {
                Some(name) => format!("function {name}() {{ … }}"),
                None => "function () { … }".to_string(),
            },
            Value::Builtin(builtin) => format!("function {}() {{ [native code] }}", builtin.name),
        }
    }

    /// The primitive the additive operator sees: strings stay strings,
    /// reference values flatten to strings, the rest stay as they are.
    pub(crate) fn to_additive_primitive(&self) -> Value {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Builtin(_) => {
                Value::string(self.to_display_string())
            }
            value => value.clone(),
        }
    }

    /// Strict equality (`===`).
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => std::ptr::fn_addr_eq(a.call, b.call),
            _ => false,
        }
    }

    /// Loose equality (`==`).
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Number(_), Value::Number(_))
            | (Value::Str(_), Value::Str(_))
            | (Value::Bool(_), Value::Bool(_)) => self.strict_equals(other),
            (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
                Value::string(self.to_display_string()).loose_equals(other)
            }
            (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Array(_) | Value::Object(_)) => {
                other.loose_equals(self)
            }
            _ => self.strict_equals(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Formats a number the way the source language prints it: integral values
/// without a fraction, `NaN` and infinities by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercions() {
        assert_eq!(Value::string("42").to_number(), 42.0);
        assert_eq!(Value::string(" 0x2a ").to_number(), 42.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::Undefined.to_number().is_nan());
        assert_eq!(Value::string("").to_number(), 0.0);
    }

    #[test]
    fn loose_equality_bridges_types() {
        assert!(Value::Number(1.0).loose_equals(&Value::string("1")));
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
    }

    #[test]
    fn number_formatting_matches_source_language() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn array_display_joins_with_commas() {
        let array = Value::array(vec![Value::Number(1.0), Value::string("a"), Value::Null]);
        assert_eq!(array.to_display_string(), "1,a,");
    }
}
