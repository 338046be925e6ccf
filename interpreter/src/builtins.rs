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

//! The ambient values of the sandbox.
//!
//! Only effect-free intrinsics are installed: a console that discards, safe
//! numeric and string helpers, a stable clock, an opaque `require`, and the
//! recording hooks the harness preamble calls. Nothing here can reach the
//! filesystem, the network, or the host process.

use crate::{
    context::CapturedValue,
    interpreter::{EvalError, EvalResult, Interpreter},
    scope::{Scope, ScopeRef},
    value::{Builtin, Value, format_number},
};

use indexmap::IndexMap;

fn builtin(name: &'static str, call: fn(&mut Interpreter, Value, &[Value]) -> EvalResult<Value>) -> Value {
    Value::Builtin(Builtin { name, call })
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn type_error<T>(message: impl Into<String>) -> EvalResult<T> {
    Err(EvalError::thrown(format!("TypeError: {}", message.into())))
}

/// Installs the ambient globals into the root scope.
pub(crate) fn install(global: &ScopeRef) {
    let discard = builtin("log", |_, _, _| Ok(Value::Undefined));
    let console = Value::object(IndexMap::from([
        ("log".to_string(), discard.clone()),
        ("info".to_string(), discard.clone()),
        ("warn".to_string(), discard.clone()),
        ("error".to_string(), discard.clone()),
        ("debug".to_string(), discard),
    ]));
    Scope::declare(global, "console", console);

    let math = Value::object(IndexMap::from([
        ("floor".to_string(), builtin("floor", |_, _, a| Ok(Value::Number(arg(a, 0).to_number().floor())))),
        ("ceil".to_string(), builtin("ceil", |_, _, a| Ok(Value::Number(arg(a, 0).to_number().ceil())))),
        ("round".to_string(), builtin("round", |_, _, a| Ok(Value::Number(arg(a, 0).to_number().round())))),
        ("abs".to_string(), builtin("abs", |_, _, a| Ok(Value::Number(arg(a, 0).to_number().abs())))),
        ("sqrt".to_string(), builtin("sqrt", |_, _, a| Ok(Value::Number(arg(a, 0).to_number().sqrt())))),
        ("pow".to_string(), builtin("pow", |_, _, a| {
            Ok(Value::Number(arg(a, 0).to_number().powf(arg(a, 1).to_number())))
        })),
        ("max".to_string(), builtin("max", |_, _, a| {
            Ok(Value::Number(a.iter().map(Value::to_number).fold(f64::NEG_INFINITY, f64::max)))
        })),
        ("min".to_string(), builtin("min", |_, _, a| {
            Ok(Value::Number(a.iter().map(Value::to_number).fold(f64::INFINITY, f64::min)))
        })),
        // Deterministic by design: helpers that consult randomness are
        // outside the rewrite contract anyway.
        ("random".to_string(), builtin("random", |_, _, _| Ok(Value::Number(0.0)))),
        ("PI".to_string(), Value::Number(std::f64::consts::PI)),
        ("E".to_string(), Value::Number(std::f64::consts::E)),
    ]));
    Scope::declare(global, "Math", math);

    let json = Value::object(IndexMap::from([
        ("stringify".to_string(), builtin("stringify", json_stringify)),
        ("parse".to_string(), builtin("parse", json_parse)),
    ]));
    Scope::declare(global, "JSON", json);

    // A stable clock: milliseconds since the evaluation started.
    let date = Value::object(IndexMap::from([(
        "now".to_string(),
        builtin("now", |interp, _, _| {
            Ok(Value::Number(interp.started.elapsed().as_secs_f64() * 1000.0))
        }),
    )]));
    Scope::declare(global, "Date", date);

    Scope::declare(global, "String", builtin("String", |_, _, a| {
        Ok(Value::string(arg(a, 0).to_display_string()))
    }));
    Scope::declare(global, "Number", builtin("Number", |_, _, a| {
        Ok(Value::Number(arg(a, 0).to_number()))
    }));
    Scope::declare(global, "Boolean", builtin("Boolean", |_, _, a| Ok(Value::Bool(arg(a, 0).truthy()))));
    Scope::declare(global, "Array", builtin("Array", |_, _, a| {
        if let [Value::Number(n)] = a {
            return Ok(Value::array(vec![Value::Undefined; *n as usize]));
        }
        Ok(Value::array(a.to_vec()))
    }));

    Scope::declare(global, "parseInt", builtin("parseInt", parse_int));
    Scope::declare(global, "parseFloat", builtin("parseFloat", parse_float));
    Scope::declare(global, "isNaN", builtin("isNaN", |_, _, a| {
        Ok(Value::Bool(arg(a, 0).to_number().is_nan()))
    }));
    Scope::declare(global, "isFinite", builtin("isFinite", |_, _, a| {
        Ok(Value::Bool(arg(a, 0).to_number().is_finite()))
    }));

    Scope::declare(global, "Error", builtin("Error", error_constructor));
    Scope::declare(global, "TypeError", builtin("TypeError", type_error_constructor));
    Scope::declare(global, "RangeError", builtin("RangeError", range_error_constructor));
    Scope::declare(global, "SyntaxError", builtin("SyntaxError", syntax_error_constructor));
    Scope::declare(global, "ReferenceError", builtin("ReferenceError", reference_error_constructor));

    // Opaque module loader: yields the requested name itself.
    Scope::declare(global, "require", builtin("require", |_, _, a| Ok(arg(a, 0))));

    Scope::declare(global, "NaN", Value::Number(f64::NAN));
    Scope::declare(global, "Infinity", Value::Number(f64::INFINITY));
    Scope::declare(global, "undefined", Value::Undefined);
    Scope::declare(global, "this", Value::Undefined);

    // The hooks the harness preamble records results through.
    Scope::declare(global, "__dejs_record", builtin("__dejs_record", record_result));
    Scope::declare(global, "__dejs_record_error", builtin("__dejs_record_error", record_error));
}

// Recording hooks.

fn record_result(interp: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let key = arg(args, 0).to_display_string();
    let value = CapturedValue::from_value(&arg(args, 1));
    let elapsed = arg(args, 2).to_number().max(0.0);
    interp.context.record_result(key, value, elapsed);
    Ok(Value::Undefined)
}

fn record_error(interp: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let key = arg(args, 0).to_display_string();
    let message = arg(args, 1).to_display_string();
    let elapsed = arg(args, 2).to_number().max(0.0);
    interp.context.record_error(key, message, elapsed);
    Ok(Value::Undefined)
}

// Constructors and conversions.

/// Builds an error-shaped object whose `name` matches the constructor that
/// was actually invoked.
fn make_error(name: &str, args: &[Value]) -> Value {
    let message = match args.first() {
        Some(message) => message.to_display_string(),
        None => String::new(),
    };
    Value::object(IndexMap::from([
        ("name".to_string(), Value::string(name)),
        ("message".to_string(), Value::string(message)),
    ]))
}

fn error_constructor(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    Ok(make_error("Error", args))
}

fn type_error_constructor(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    Ok(make_error("TypeError", args))
}

fn range_error_constructor(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    Ok(make_error("RangeError", args))
}

fn syntax_error_constructor(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    Ok(make_error("SyntaxError", args))
}

fn reference_error_constructor(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    Ok(make_error("ReferenceError", args))
}

/// The message the log records for a thrown value, favoring the `message`
/// property of error-shaped objects.
pub(crate) fn error_message(value: &Value) -> String {
    if let Value::Object(properties) = value {
        let properties = properties.borrow();
        if let Some(message) = properties.get("message") {
            let name = properties.get("name").map_or_else(|| "Error".to_string(), Value::to_display_string);
            return format!("{name}: {}", message.to_display_string());
        }
    }
    value.to_display_string()
}

fn parse_int(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let text = arg(args, 0).to_display_string();
    let mut text = text.trim();
    let mut sign = 1.0;
    if let Some(rest) = text.strip_prefix('-') {
        sign = -1.0;
        text = rest;
    } else if let Some(rest) = text.strip_prefix('+') {
        text = rest;
    }

    let mut radix = match args.get(1).map(Value::to_number) {
        Some(r) if r.is_finite() && r != 0.0 => r as u32,
        _ => 10,
    };
    if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }
    if (radix == 16 || radix == 10) && (text.starts_with("0x") || text.starts_with("0X")) {
        text = &text[2..];
        radix = 16;
    }

    let digits: String = text.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return Ok(Value::Number(f64::NAN));
    }
    match u64::from_str_radix(&digits, radix) {
        Ok(n) => Ok(Value::Number(sign * n as f64)),
        Err(_) => Ok(Value::Number(f64::NAN)),
    }
}

fn parse_float(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let text = arg(args, 0).to_display_string();
    let trimmed = text.trim();
    let mut end = 0;
    let bytes = trimmed.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                end += 1;
            }
            b'e' | b'E' if !seen_exp && end > 0 => {
                seen_exp = true;
                end += 1;
                if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                    end += 1;
                }
            }
            _ => break,
        }
    }
    Ok(Value::Number(trimmed[..end].parse().unwrap_or(f64::NAN)))
}

// JSON.

fn json_stringify(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    match value_to_json(&arg(args, 0)) {
        Some(json) => Ok(Value::string(json.to_string())),
        None => Ok(Value::Undefined),
    }
}

fn json_parse(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let text = arg(args, 0).to_display_string();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => Ok(json_to_value(&json)),
        Err(error) => Err(EvalError::thrown(format!("SyntaxError: {error}"))),
    }
}

fn value_to_json(value: &Value) -> Option<serde_json::Value> {
    Some(match value {
        Value::Undefined | Value::Function(_) | Value::Builtin(_) => return None,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.as_ref().clone()),
        Value::Array(elements) => serde_json::Value::Array(
            elements
                .borrow()
                .iter()
                .map(|element| value_to_json(element).unwrap_or(serde_json::Value::Null))
                .collect(),
        ),
        Value::Object(properties) => serde_json::Value::Object(
            properties
                .borrow()
                .iter()
                .filter_map(|(key, value)| value_to_json(value).map(|json| (key.clone(), json)))
                .collect(),
        ),
    })
}

fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s.clone()),
        serde_json::Value::Array(elements) => Value::array(elements.iter().map(json_to_value).collect()),
        serde_json::Value::Object(properties) => Value::object(
            properties.iter().map(|(key, value)| (key.clone(), json_to_value(value))).collect(),
        ),
    }
}

// Member access.

/// Reads `object[key]`, dispatching to property tables and method builtins.
pub(crate) fn get_member(object: &Value, key: &str) -> EvalResult<Value> {
    match object {
        Value::Undefined | Value::Null => {
            type_error(format!("Cannot read properties of {} (reading '{key}')", object.to_display_string()))
        }
        Value::Object(properties) => Ok(properties.borrow().get(key).cloned().unwrap_or(Value::Undefined)),
        Value::Array(elements) => {
            if key == "length" {
                return Ok(Value::Number(elements.borrow().len() as f64));
            }
            if let Ok(index) = key.parse::<usize>() {
                return Ok(elements.borrow().get(index).cloned().unwrap_or(Value::Undefined));
            }
            Ok(array_method(key).map(Value::Builtin).unwrap_or(Value::Undefined))
        }
        Value::Str(s) => {
            if key == "length" {
                return Ok(Value::Number(s.chars().count() as f64));
            }
            if let Ok(index) = key.parse::<usize>() {
                return Ok(s
                    .chars()
                    .nth(index)
                    .map_or(Value::Undefined, |c| Value::string(c.to_string())));
            }
            Ok(string_method(key).map(Value::Builtin).unwrap_or(Value::Undefined))
        }
        Value::Number(_) | Value::Bool(_) => {
            Ok(number_method(key).map(Value::Builtin).unwrap_or(Value::Undefined))
        }
        Value::Function(closure) => Ok(match key {
            "call" => builtin_value("call", function_call),
            "apply" => builtin_value("apply", function_apply),
            "name" => Value::string(closure.name.clone().unwrap_or_default()),
            "length" => Value::Number(closure.params.len() as f64),
            _ => Value::Undefined,
        }),
        Value::Builtin(b) => Ok(namespace_member(b.name, key)),
    }
}

fn builtin_value(name: &'static str, call: fn(&mut Interpreter, Value, &[Value]) -> EvalResult<Value>) -> Value {
    Value::Builtin(Builtin { name, call })
}

/// Static members of the callable globals, e.g. `String.fromCharCode`.
fn namespace_member(namespace: &str, key: &str) -> Value {
    match (namespace, key) {
        ("String", "fromCharCode") => builtin_value("fromCharCode", string_from_char_code),
        ("Array", "isArray") => builtin_value("isArray", |_, _, a| {
            Ok(Value::Bool(matches!(arg(a, 0), Value::Array(_))))
        }),
        ("Number", "isInteger") => builtin_value("isInteger", |_, _, a| {
            let n = arg(a, 0);
            match n {
                Value::Number(n) => Ok(Value::Bool(n.is_finite() && n == n.trunc())),
                _ => Ok(Value::Bool(false)),
            }
        }),
        _ => Value::Undefined,
    }
}

/// Writes `object[key] = value`. Writes to primitives are silently dropped,
/// as sloppy-mode source does.
pub(crate) fn set_member(object: &Value, key: &str, value: Value) -> EvalResult<()> {
    match object {
        Value::Undefined | Value::Null => {
            type_error(format!("Cannot set properties of {}", object.to_display_string()))
        }
        Value::Object(properties) => {
            properties.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(elements) => {
            if key == "length" {
                let new_len = value.to_number().max(0.0) as usize;
                elements.borrow_mut().resize(new_len, Value::Undefined);
                return Ok(());
            }
            if let Ok(index) = key.parse::<usize>() {
                let mut elements = elements.borrow_mut();
                if index >= elements.len() {
                    elements.resize(index + 1, Value::Undefined);
                }
                elements[index] = value;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Deletes `object[key]`, reporting whether the delete is considered
/// successful.
pub(crate) fn delete_member(object: &Value, key: &str) -> bool {
    match object {
        Value::Object(properties) => {
            properties.borrow_mut().shift_remove(key);
            true
        }
        Value::Array(elements) => {
            if let Ok(index) = key.parse::<usize>() {
                let mut elements = elements.borrow_mut();
                if index < elements.len() {
                    elements[index] = Value::Undefined;
                }
            }
            true
        }
        _ => true,
    }
}

// Function prototype methods.

fn function_call(interp: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let bound_this = arg(args, 0);
    let rest = args.get(1..).unwrap_or_default().to_vec();
    interp.call_value(this, bound_this, rest)
}

fn function_apply(interp: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let bound_this = arg(args, 0);
    let rest = match arg(args, 1) {
        Value::Array(elements) => elements.borrow().clone(),
        Value::Undefined | Value::Null => Vec::new(),
        _ => return type_error("second argument to apply must be an array"),
    };
    interp.call_value(this, bound_this, rest)
}

// String methods.

fn string_method(name: &str) -> Option<Builtin> {
    let call: fn(&mut Interpreter, Value, &[Value]) -> EvalResult<Value> = match name {
        "charAt" => string_char_at,
        "charCodeAt" => string_char_code_at,
        "indexOf" => string_index_of,
        "lastIndexOf" => string_last_index_of,
        "slice" => string_slice,
        "substring" => string_substring,
        "substr" => string_substr,
        "split" => string_split,
        "toLowerCase" => |_: &mut Interpreter, this: Value, _: &[Value]| {
            Ok(Value::string(this.to_display_string().to_lowercase()))
        },
        "toUpperCase" => |_: &mut Interpreter, this: Value, _: &[Value]| {
            Ok(Value::string(this.to_display_string().to_uppercase()))
        },
        "trim" => |_: &mut Interpreter, this: Value, _: &[Value]| {
            Ok(Value::string(this.to_display_string().trim().to_string()))
        },
        "replace" => string_replace,
        "concat" => string_concat,
        "toString" => |_: &mut Interpreter, this: Value, _: &[Value]| {
            Ok(Value::string(this.to_display_string()))
        },
        _ => return None,
    };
    Some(Builtin { name: "stringMethod", call })
}

fn this_string(this: &Value) -> Vec<char> {
    this.to_display_string().chars().collect()
}

fn string_char_at(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let chars = this_string(&this);
    let index = arg(args, 0).to_number();
    if index < 0.0 {
        return Ok(Value::string(""));
    }
    Ok(chars.get(index as usize).map_or(Value::string(""), |c| Value::string(c.to_string())))
}

fn string_char_code_at(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let chars = this_string(&this);
    let index = arg(args, 0).to_number();
    if index < 0.0 {
        return Ok(Value::Number(f64::NAN));
    }
    Ok(chars
        .get(index as usize)
        .map_or(Value::Number(f64::NAN), |c| Value::Number(f64::from(*c as u32))))
}

fn string_from_char_code(_: &mut Interpreter, _this: Value, args: &[Value]) -> EvalResult<Value> {
    let mut out = String::with_capacity(args.len());
    for code in args {
        let code = code.to_number();
        if !code.is_finite() || code < 0.0 {
            continue;
        }
        if let Some(c) = char::from_u32(code as u32) {
            out.push(c);
        }
    }
    Ok(Value::string(out))
}

fn string_index_of(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let haystack = this.to_display_string();
    let needle = arg(args, 0).to_display_string();
    let chars: Vec<char> = haystack.chars().collect();
    let from = arg(args, 1).to_number().max(0.0) as usize;
    match haystack
        .char_indices()
        .enumerate()
        .skip(from)
        .find(|(_, (byte, _))| haystack[*byte..].starts_with(&needle))
    {
        Some((char_index, _)) => Ok(Value::Number(char_index as f64)),
        None if needle.is_empty() => Ok(Value::Number(from.min(chars.len()) as f64)),
        None => Ok(Value::Number(-1.0)),
    }
}

fn string_last_index_of(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let haystack = this.to_display_string();
    let needle = arg(args, 0).to_display_string();
    let mut last = -1.0;
    for (char_index, (byte, _)) in haystack.char_indices().enumerate() {
        if haystack[byte..].starts_with(&needle) {
            last = char_index as f64;
        }
    }
    Ok(Value::Number(last))
}

/// Resolves a possibly negative index against `len` the way `slice` does.
fn relative_index(value: f64, len: usize) -> usize {
    if value.is_nan() {
        0
    } else if value < 0.0 {
        len.saturating_sub((-value) as usize)
    } else {
        (value as usize).min(len)
    }
}

fn string_slice(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let chars = this_string(&this);
    let start = relative_index(arg(args, 0).to_number(), chars.len());
    let end = match args.get(1) {
        Some(end) => relative_index(end.to_number(), chars.len()),
        None => chars.len(),
    };
    Ok(Value::string(chars[start..end.max(start)].iter().collect::<String>()))
}

fn string_substring(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let chars = this_string(&this);
    let a = (arg(args, 0).to_number().max(0.0) as usize).min(chars.len());
    let b = match args.get(1) {
        Some(end) => (end.to_number().max(0.0) as usize).min(chars.len()),
        None => chars.len(),
    };
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn string_substr(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let chars = this_string(&this);
    let start = relative_index(arg(args, 0).to_number(), chars.len());
    let count = match args.get(1) {
        Some(count) => count.to_number().max(0.0) as usize,
        None => chars.len(),
    };
    let end = start.saturating_add(count).min(chars.len());
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn string_split(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let text = this.to_display_string();
    match args.first() {
        None | Some(Value::Undefined) => Ok(Value::array(vec![Value::string(text)])),
        Some(separator) => {
            let separator = separator.to_display_string();
            let parts: Vec<Value> = if separator.is_empty() {
                text.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                text.split(&separator).map(Value::string).collect()
            };
            Ok(Value::array(parts))
        }
    }
}

fn string_replace(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let text = this.to_display_string();
    let find = arg(args, 0);
    if matches!(find, Value::Function(_) | Value::Builtin(_)) || matches!(arg(args, 1), Value::Function(_)) {
        return type_error("replace with a function is outside the sandbox subset");
    }
    let find = find.to_display_string();
    let replacement = arg(args, 1).to_display_string();
    Ok(Value::string(text.replacen(&find, &replacement, 1)))
}

fn string_concat(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let mut out = this.to_display_string();
    for part in args {
        out.push_str(&part.to_display_string());
    }
    Ok(Value::string(out))
}

// Array methods.

fn array_method(name: &str) -> Option<Builtin> {
    let call: fn(&mut Interpreter, Value, &[Value]) -> EvalResult<Value> = match name {
        "push" => array_push,
        "pop" => array_pop,
        "shift" => array_shift,
        "unshift" => array_unshift,
        "join" => array_join,
        "reverse" => array_reverse,
        "slice" => array_slice,
        "indexOf" => array_index_of,
        "concat" => array_concat,
        "map" => array_map,
        "forEach" => array_for_each,
        "includes" => array_includes,
        "toString" => |_: &mut Interpreter, this: Value, _: &[Value]| {
            Ok(Value::string(this.to_display_string()))
        },
        _ => return None,
    };
    Some(Builtin { name: "arrayMethod", call })
}

fn this_array(this: &Value) -> EvalResult<std::rc::Rc<std::cell::RefCell<Vec<Value>>>> {
    match this {
        Value::Array(elements) => Ok(elements.clone()),
        _ => type_error("receiver is not an array"),
    }
}

fn array_push(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    elements.borrow_mut().extend(args.iter().cloned());
    Ok(Value::Number(elements.borrow().len() as f64))
}

fn array_pop(_: &mut Interpreter, this: Value, _args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let popped = elements.borrow_mut().pop();
    Ok(popped.unwrap_or(Value::Undefined))
}

fn array_shift(_: &mut Interpreter, this: Value, _args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let mut elements = elements.borrow_mut();
    if elements.is_empty() { Ok(Value::Undefined) } else { Ok(elements.remove(0)) }
}

fn array_unshift(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let mut elements = elements.borrow_mut();
    for (offset, value) in args.iter().enumerate() {
        elements.insert(offset, value.clone());
    }
    Ok(Value::Number(elements.len() as f64))
}

fn array_join(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let separator = match args.first() {
        None | Some(Value::Undefined) => ",".to_string(),
        Some(separator) => separator.to_display_string(),
    };
    let joined = elements
        .borrow()
        .iter()
        .map(|element| match element {
            Value::Undefined | Value::Null => String::new(),
            element => element.to_display_string(),
        })
        .collect::<Vec<_>>()
        .join(&separator);
    Ok(Value::string(joined))
}

fn array_reverse(_: &mut Interpreter, this: Value, _args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    elements.borrow_mut().reverse();
    Ok(this)
}

fn array_slice(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let elements = elements.borrow();
    let start = relative_index(arg(args, 0).to_number(), elements.len());
    let end = match args.get(1) {
        Some(end) => relative_index(end.to_number(), elements.len()),
        None => elements.len(),
    };
    Ok(Value::array(elements[start..end.max(start)].to_vec()))
}

fn array_index_of(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let needle = arg(args, 0);
    let found = elements.borrow().iter().position(|element| element.strict_equals(&needle));
    Ok(Value::Number(found.map_or(-1.0, |index| index as f64)))
}

fn array_includes(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let needle = arg(args, 0);
    let found = elements.borrow().iter().any(|element| element.strict_equals(&needle));
    Ok(Value::Bool(found))
}

fn array_concat(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let mut out = elements.borrow().clone();
    for value in args {
        match value {
            Value::Array(more) => out.extend(more.borrow().iter().cloned()),
            value => out.push(value.clone()),
        }
    }
    Ok(Value::array(out))
}

fn array_map(interp: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let callback = arg(args, 0);
    let snapshot = elements.borrow().clone();
    let mut out = Vec::with_capacity(snapshot.len());
    for (index, element) in snapshot.into_iter().enumerate() {
        let mapped = interp.call_value(
            callback.clone(),
            Value::Undefined,
            vec![element, Value::Number(index as f64), this.clone()],
        )?;
        out.push(mapped);
    }
    Ok(Value::array(out))
}

fn array_for_each(interp: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let elements = this_array(&this)?;
    let callback = arg(args, 0);
    let snapshot = elements.borrow().clone();
    for (index, element) in snapshot.into_iter().enumerate() {
        interp.call_value(
            callback.clone(),
            Value::Undefined,
            vec![element, Value::Number(index as f64), this.clone()],
        )?;
    }
    Ok(Value::Undefined)
}

// Number methods.

fn number_method(name: &str) -> Option<Builtin> {
    let call: fn(&mut Interpreter, Value, &[Value]) -> EvalResult<Value> = match name {
        "toString" => number_to_string,
        "toFixed" => number_to_fixed,
        _ => return None,
    };
    Some(Builtin { name: "numberMethod", call })
}

fn number_to_string(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let n = this.to_number();
    let radix = match args.first() {
        None | Some(Value::Undefined) => 10,
        Some(radix) => radix.to_number() as u32,
    };
    if radix == 10 {
        return Ok(Value::string(format_number(n)));
    }
    if !(2..=36).contains(&radix) {
        return Err(EvalError::thrown("RangeError: toString() radix must be between 2 and 36"));
    }
    if !n.is_finite() {
        return Ok(Value::string(format_number(n)));
    }

    // Digit conversion for integral values; fractions are truncated.
    let negative = n < 0.0;
    let mut magnitude = n.abs().trunc() as u64;
    let mut digits = Vec::new();
    loop {
        let digit = (magnitude % u64::from(radix)) as u32;
        digits.push(char::from_digit(digit, radix).unwrap_or('0'));
        magnitude /= u64::from(radix);
        if magnitude == 0 {
            break;
        }
    }
    if negative {
        digits.push('-');
    }
    Ok(Value::string(digits.into_iter().rev().collect::<String>()))
}

fn number_to_fixed(_: &mut Interpreter, this: Value, args: &[Value]) -> EvalResult<Value> {
    let n = this.to_number();
    let places = arg(args, 0).to_number().clamp(0.0, 100.0) as usize;
    Ok(Value::string(format!("{n:.places$}")))
}
