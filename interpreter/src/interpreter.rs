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

//! The tree-walking evaluator.
//!
//! Runtime failures come in two flavors. A thrown value propagates like the
//! source language's exceptions and is catchable by `try`/`catch`; the
//! harness wraps every driver call in one, so a single bad helper invocation
//! never spoils the rest. A resource abort (deadline, step budget, recursion
//! depth) is not catchable and fails the whole evaluation, which is the
//! contract that keeps the sandbox from hanging.

use crate::{
    builtins,
    context::SandboxContext,
    scope::{Scope, ScopeRef},
    value::{Closure, FunctionBody, Value},
};

use dejs_ast::*;
use dejs_errors::InterpreterError;

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

/// A runtime failure: a catchable thrown value or an uncatchable abort.
pub enum EvalError {
    Thrown(Value),
    Abort(InterpreterError),
}

impl EvalError {
    /// Builds a thrown error value carrying `message`.
    pub(crate) fn thrown(message: impl Into<String>) -> Self {
        EvalError::Thrown(Value::string(message.into()))
    }

    /// The message the call log records for this failure.
    pub fn message(&self) -> String {
        match self {
            EvalError::Thrown(value) => builtins::error_message(value),
            EvalError::Abort(error) => error.to_string(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// How a statement finished.
pub(crate) enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// The resource policy of one evaluation.
#[derive(Clone, Debug)]
pub struct Limits {
    /// Wall-clock budget for the whole evaluation.
    pub timeout: Duration,
    /// Evaluation step budget; one step is one node visit.
    pub step_limit: u64,
    /// Maximum user-function call depth.
    pub depth_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), step_limit: 50_000_000, depth_limit: 128 }
    }
}

/// The sandboxed interpreter for one program run.
pub struct Interpreter {
    pub(crate) global: ScopeRef,
    /// Results and call log, mutated from inside the sandbox through the
    /// recording hooks.
    pub context: SandboxContext,
    pub(crate) started: Instant,
    deadline: Instant,
    limits: Limits,
    steps: u64,
    depth: usize,
}

impl Interpreter {
    pub fn new(limits: Limits) -> Self {
        let global = Scope::root();
        builtins::install(&global);
        let started = Instant::now();
        Self {
            global,
            context: SandboxContext::default(),
            started,
            deadline: started + limits.timeout,
            limits,
            steps: 0,
            depth: 0,
        }
    }

    /// Runs a whole program in the global scope.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        let scope = self.global.clone();
        self.hoist_statements(&program.statements, &scope);
        for statement in &program.statements {
            // Top-level return/break/continue have nothing to act on.
            self.exec_statement(statement, &scope)?;
        }
        Ok(())
    }

    /// Consumes the interpreter, yielding the recorded context.
    pub fn into_context(self) -> SandboxContext {
        self.context
    }

    /// Charges one evaluation step and enforces the resource policy.
    fn charge(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.limits.step_limit {
            return Err(EvalError::Abort(InterpreterError::StepLimitExceeded {
                limit: self.limits.step_limit,
            }));
        }
        // The clock is only consulted every so often; reading it is much
        // slower than an evaluation step.
        if self.steps & 0x3ff == 0 && Instant::now() >= self.deadline {
            return Err(EvalError::Abort(InterpreterError::Timeout { limit: self.limits.timeout }));
        }
        Ok(())
    }

    // Hoisting.

    /// Declares the function declarations and `var` names of one function
    /// (or program) scope before execution, so forward references and
    /// assignments ahead of their declaration statement resolve.
    fn hoist_statements(&mut self, statements: &[Statement], scope: &ScopeRef) {
        for statement in statements {
            self.hoist_statement(statement, scope);
        }
    }

    fn hoist_statement(&mut self, statement: &Statement, scope: &ScopeRef) {
        match statement {
            Statement::Function(declaration) => {
                let closure = Closure {
                    name: Some(declaration.name.name.clone()),
                    params: declaration.params.clone(),
                    body: FunctionBody::Block(declaration.body.clone()),
                    scope: scope.clone(),
                };
                Scope::declare(scope, declaration.name.name.clone(), Value::Function(Rc::new(closure)));
            }
            Statement::Definition(declaration) if declaration.kind == DeclarationKind::Var => {
                for declarator in &declaration.declarators {
                    self.hoist_var(&declarator.name, scope);
                }
            }
            Statement::Block(block) => self.hoist_statements(&block.statements, scope),
            Statement::If(stmt) => {
                self.hoist_statement(&stmt.then, scope);
                if let Some(otherwise) = &stmt.otherwise {
                    self.hoist_statement(otherwise, scope);
                }
            }
            Statement::While(stmt) => self.hoist_statement(&stmt.body, scope),
            Statement::DoWhile(stmt) => self.hoist_statement(&stmt.body, scope),
            Statement::For(stmt) => {
                if let ForInit::Declaration(declaration) = &stmt.init
                    && declaration.kind == DeclarationKind::Var
                {
                    for declarator in &declaration.declarators {
                        self.hoist_var(&declarator.name, scope);
                    }
                }
                self.hoist_statement(&stmt.body, scope);
            }
            Statement::ForIn(stmt) => {
                if stmt.kind == Some(DeclarationKind::Var) {
                    self.hoist_var(&stmt.binding, scope);
                }
                self.hoist_statement(&stmt.body, scope);
            }
            Statement::Try(stmt) => {
                self.hoist_statements(&stmt.block.statements, scope);
                if let Some(handler) = &stmt.handler {
                    self.hoist_statements(&handler.body.statements, scope);
                }
                if let Some(finalizer) = &stmt.finalizer {
                    self.hoist_statements(&finalizer.statements, scope);
                }
            }
            Statement::Switch(stmt) => {
                for case in &stmt.cases {
                    self.hoist_statements(&case.body, scope);
                }
            }
            _ => {}
        }
    }

    fn hoist_var(&mut self, name: &Identifier, scope: &ScopeRef) {
        // A hoisted `var` never overwrites an already hoisted function, but
        // it must shadow outer bindings, so only the local frame is checked.
        if !Scope::declared_locally(scope, &name.name) {
            Scope::declare(scope, name.name.clone(), Value::Undefined);
        }
    }

    // Statements.

    pub(crate) fn exec_statement(&mut self, statement: &Statement, scope: &ScopeRef) -> EvalResult<Flow> {
        self.charge()?;
        match statement {
            Statement::Block(block) => {
                let inner = Scope::child(scope);
                self.exec_block(block, &inner)
            }
            Statement::Break(_) => Ok(Flow::Break),
            Statement::Comment(_) => Ok(Flow::Normal),
            Statement::Continue(_) => Ok(Flow::Continue),
            Statement::Definition(declaration) => {
                self.exec_definition(declaration, scope)?;
                Ok(Flow::Normal)
            }
            Statement::DoWhile(stmt) => {
                loop {
                    match self.exec_statement(&stmt.body, scope)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    if !self.eval_expression(&stmt.condition, scope)?.truthy() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::Expression(stmt) => {
                self.eval_expression(&stmt.expression, scope)?;
                Ok(Flow::Normal)
            }
            Statement::For(stmt) => self.exec_for(stmt, scope),
            Statement::ForIn(stmt) => self.exec_for_in(stmt, scope),
            // Declarations were hoisted on scope entry.
            Statement::Function(_) => Ok(Flow::Normal),
            Statement::If(stmt) => {
                if self.eval_expression(&stmt.condition, scope)?.truthy() {
                    self.exec_statement(&stmt.then, scope)
                } else if let Some(otherwise) = &stmt.otherwise {
                    self.exec_statement(otherwise, scope)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Statement::Return(stmt) => {
                let value = match &stmt.expression {
                    Some(expression) => self.eval_expression(expression, scope)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            Statement::Switch(stmt) => self.exec_switch(stmt, scope),
            Statement::Throw(stmt) => {
                let value = self.eval_expression(&stmt.expression, scope)?;
                Err(EvalError::Thrown(value))
            }
            Statement::Try(stmt) => self.exec_try(stmt, scope),
            Statement::While(stmt) => {
                loop {
                    if !self.eval_expression(&stmt.condition, scope)?.truthy() {
                        break;
                    }
                    match self.exec_statement(&stmt.body, scope)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
        }
    }

    fn exec_block(&mut self, block: &Block, scope: &ScopeRef) -> EvalResult<Flow> {
        for statement in &block.statements {
            match self.exec_statement(statement, scope)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_definition(&mut self, declaration: &VariableDeclaration, scope: &ScopeRef) -> EvalResult<()> {
        for declarator in &declaration.declarators {
            let value = match &declarator.init {
                Some(init) => self.eval_expression(init, scope)?,
                None => Value::Undefined,
            };
            match declaration.kind {
                // `var` writes the binding hoisted at function entry.
                DeclarationKind::Var => {
                    if declarator.init.is_some() {
                        Scope::assign(scope, &declarator.name.name, value);
                    }
                }
                DeclarationKind::Let | DeclarationKind::Const => {
                    Scope::declare(scope, declarator.name.name.clone(), value);
                }
            }
        }
        Ok(())
    }

    fn exec_for(&mut self, stmt: &ForStatement, scope: &ScopeRef) -> EvalResult<Flow> {
        // The header gets its own frame so `let i` stays loop-local.
        let header = Scope::child(scope);
        match &stmt.init {
            ForInit::None => {}
            ForInit::Declaration(declaration) => self.exec_definition(declaration, &header)?,
            ForInit::Expression(expression) => {
                self.eval_expression(expression, &header)?;
            }
        }
        loop {
            if let Some(condition) = &stmt.condition
                && !self.eval_expression(condition, &header)?.truthy()
            {
                break;
            }
            match self.exec_statement(&stmt.body, &header)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
            if let Some(update) = &stmt.update {
                self.eval_expression(update, &header)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_for_in(&mut self, stmt: &ForInStatement, scope: &ScopeRef) -> EvalResult<Flow> {
        let object = self.eval_expression(&stmt.object, scope)?;
        let items: Vec<Value> = if stmt.is_of {
            match &object {
                Value::Array(elements) => elements.borrow().clone(),
                Value::Str(s) => s.chars().map(|c| Value::string(c.to_string())).collect(),
                _ => return Err(EvalError::thrown("TypeError: value is not iterable")),
            }
        } else {
            match &object {
                Value::Object(properties) => {
                    properties.borrow().keys().map(|k| Value::string(k.clone())).collect()
                }
                Value::Array(elements) => {
                    (0..elements.borrow().len()).map(|i| Value::string(i.to_string())).collect()
                }
                // Enumerating a primitive yields nothing.
                _ => Vec::new(),
            }
        };

        let header = Scope::child(scope);
        if stmt.kind.is_some() {
            Scope::declare(&header, stmt.binding.name.clone(), Value::Undefined);
        }
        for item in items {
            Scope::assign(&header, &stmt.binding.name, item);
            match self.exec_statement(&stmt.body, &header)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_switch(&mut self, stmt: &SwitchStatement, scope: &ScopeRef) -> EvalResult<Flow> {
        let discriminant = self.eval_expression(&stmt.discriminant, scope)?;

        let mut start = None;
        for (index, case) in stmt.cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let test = self.eval_expression(test, scope)?;
                if discriminant.strict_equals(&test) {
                    start = Some(index);
                    break;
                }
            }
        }
        let start = start.or_else(|| stmt.cases.iter().position(|case| case.test.is_none()));

        let inner = Scope::child(scope);
        if let Some(start) = start {
            // Fall through until a break.
            for case in &stmt.cases[start..] {
                for statement in &case.body {
                    match self.exec_statement(statement, &inner)? {
                        Flow::Normal => {}
                        Flow::Break => return Ok(Flow::Normal),
                        flow => return Ok(flow),
                    }
                }
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_try(&mut self, stmt: &TryStatement, scope: &ScopeRef) -> EvalResult<Flow> {
        let inner = Scope::child(scope);
        let mut result = self.exec_block(&stmt.block, &inner);

        if let (Err(EvalError::Thrown(thrown)), Some(handler)) = (&result, &stmt.handler) {
            let handler_scope = Scope::child(scope);
            if let Some(param) = &handler.param {
                Scope::declare(&handler_scope, param.name.clone(), thrown.clone());
            }
            result = self.exec_block(&handler.body, &handler_scope);
        }

        if let Some(finalizer) = &stmt.finalizer {
            let finalizer_scope = Scope::child(scope);
            match self.exec_block(finalizer, &finalizer_scope)? {
                Flow::Normal => {}
                // A completing finalizer overrides the try outcome.
                flow => return Ok(flow),
            }
        }

        result
    }

    // Expressions.

    pub(crate) fn eval_expression(&mut self, expression: &Expression, scope: &ScopeRef) -> EvalResult<Value> {
        self.charge()?;
        match expression {
            Expression::Array(expr) => {
                let mut elements = Vec::with_capacity(expr.elements.len());
                for element in &expr.elements {
                    elements.push(self.eval_expression(element, scope)?);
                }
                Ok(Value::array(elements))
            }
            Expression::Arrow(expr) => Ok(Value::Function(Rc::new(Closure::from_arrow(
                expr.params.clone(),
                expr.body.clone(),
                scope.clone(),
            )))),
            Expression::Assignment(expr) => self.eval_assignment(expr, scope),
            Expression::Binary(expr) => self.eval_binary(expr, scope),
            Expression::Call(expr) => self.eval_call(expr, scope),
            Expression::Conditional(expr) => {
                if self.eval_expression(&expr.test, scope)?.truthy() {
                    self.eval_expression(&expr.consequent, scope)
                } else {
                    self.eval_expression(&expr.alternate, scope)
                }
            }
            Expression::Function(expr) => {
                let closure = Closure {
                    name: expr.name.as_ref().map(|name| name.name.clone()),
                    params: expr.params.clone(),
                    body: FunctionBody::Block(expr.body.clone()),
                    scope: scope.clone(),
                };
                Ok(Value::Function(Rc::new(closure)))
            }
            Expression::Identifier(identifier) => Scope::lookup(scope, &identifier.name).ok_or_else(|| {
                EvalError::thrown(format!("ReferenceError: {} is not defined", identifier.name))
            }),
            Expression::Literal(literal) => self.eval_literal(literal),
            Expression::Member(expr) => {
                let object = self.eval_expression(&expr.object, scope)?;
                let key = self.eval_property_key(&expr.property, scope)?;
                builtins::get_member(&object, &key)
            }
            Expression::New(expr) => self.eval_new(expr, scope),
            Expression::Object(expr) => {
                let mut properties = indexmap::IndexMap::new();
                for property in &expr.properties {
                    let key = match &property.key {
                        PropertyKey::Identifier(name) => name.name.clone(),
                        PropertyKey::String(value, _) => value.clone(),
                        PropertyKey::Numeric(text, _) => {
                            dejs_ast::parse_integer(text).map_or_else(|| text.clone(), |n| {
                                crate::value::format_number(n)
                            })
                        }
                        PropertyKey::Computed(expr) => {
                            self.eval_expression(expr, scope)?.to_display_string()
                        }
                    };
                    let value = self.eval_expression(&property.value, scope)?;
                    properties.insert(key, value);
                }
                Ok(Value::object(properties))
            }
            Expression::Sequence(expr) => {
                let mut last = Value::Undefined;
                for expression in &expr.expressions {
                    last = self.eval_expression(expression, scope)?;
                }
                Ok(last)
            }
            Expression::Unary(expr) => self.eval_unary(expr, scope),
            Expression::Update(expr) => self.eval_update(expr, scope),
        }
    }

    fn eval_literal(&mut self, literal: &Literal) -> EvalResult<Value> {
        match literal {
            Literal::String(value, _) | Literal::Template(value, _) => Ok(Value::string(value.clone())),
            Literal::Integer(..) | Literal::Fractional(..) => literal
                .numeric_value()
                .map(Value::Number)
                .ok_or_else(|| EvalError::thrown("SyntaxError: malformed numeric literal")),
            Literal::Boolean(value, _) => Ok(Value::Bool(*value)),
            Literal::Null(_) => Ok(Value::Null),
            Literal::Undefined(_) => Ok(Value::Undefined),
            Literal::Regex(..) => {
                Err(EvalError::thrown("TypeError: regular expressions are outside the sandbox subset"))
            }
        }
    }

    fn eval_property_key(&mut self, property: &MemberProperty, scope: &ScopeRef) -> EvalResult<String> {
        match property {
            MemberProperty::Identifier(name) => Ok(name.name.clone()),
            MemberProperty::Computed(key) => {
                let key = self.eval_expression(key, scope)?;
                Ok(key.to_display_string())
            }
        }
    }

    fn eval_unary(&mut self, expr: &UnaryExpression, scope: &ScopeRef) -> EvalResult<Value> {
        if expr.op == UnaryOperation::Delete {
            if let Expression::Member(member) = &*expr.operand {
                let object = self.eval_expression(&member.object, scope)?;
                let key = self.eval_property_key(&member.property, scope)?;
                return Ok(Value::Bool(builtins::delete_member(&object, &key)));
            }
            return Ok(Value::Bool(true));
        }
        if expr.op == UnaryOperation::Typeof {
            // `typeof missing` answers rather than throws.
            if let Expression::Identifier(identifier) = &*expr.operand {
                return Ok(Value::string(match Scope::lookup(scope, &identifier.name) {
                    Some(value) => value.type_of(),
                    None => "undefined",
                }));
            }
        }

        let operand = self.eval_expression(&expr.operand, scope)?;
        Ok(match expr.op {
            UnaryOperation::Minus => Value::Number(-operand.to_number()),
            UnaryOperation::Plus => Value::Number(operand.to_number()),
            UnaryOperation::Not => Value::Bool(!operand.truthy()),
            UnaryOperation::BitNot => Value::Number(f64::from(!operand.to_int32())),
            UnaryOperation::Typeof => Value::string(operand.type_of()),
            UnaryOperation::Void => Value::Undefined,
            UnaryOperation::Delete => unreachable!("handled above"),
        })
    }

    fn eval_update(&mut self, expr: &UpdateExpression, scope: &ScopeRef) -> EvalResult<Value> {
        let old = self.eval_expression(&expr.operand, scope)?.to_number();
        let delta = match expr.op {
            UpdateOperation::Increment => 1.0,
            UpdateOperation::Decrement => -1.0,
        };
        let new = Value::Number(old + delta);
        self.assign_to(&expr.operand, new.clone(), scope)?;
        Ok(if expr.prefix { new } else { Value::Number(old) })
    }

    fn eval_binary(&mut self, expr: &BinaryExpression, scope: &ScopeRef) -> EvalResult<Value> {
        use BinaryOperation::*;

        // Logical operators short-circuit and keep operand values.
        if expr.op == And {
            let left = self.eval_expression(&expr.left, scope)?;
            return if left.truthy() { self.eval_expression(&expr.right, scope) } else { Ok(left) };
        }
        if expr.op == Or {
            let left = self.eval_expression(&expr.left, scope)?;
            return if left.truthy() { Ok(left) } else { self.eval_expression(&expr.right, scope) };
        }

        let left = self.eval_expression(&expr.left, scope)?;
        let right = self.eval_expression(&expr.right, scope)?;

        Ok(match expr.op {
            Add => {
                let l = left.to_additive_primitive();
                let r = right.to_additive_primitive();
                if matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)) {
                    Value::string(format!("{}{}", l.to_display_string(), r.to_display_string()))
                } else {
                    Value::Number(l.to_number() + r.to_number())
                }
            }
            Sub => Value::Number(left.to_number() - right.to_number()),
            Mul => Value::Number(left.to_number() * right.to_number()),
            Div => Value::Number(left.to_number() / right.to_number()),
            Mod => Value::Number(left.to_number() % right.to_number()),
            Eq => Value::Bool(left.loose_equals(&right)),
            NotEq => Value::Bool(!left.loose_equals(&right)),
            StrictEq => Value::Bool(left.strict_equals(&right)),
            StrictNotEq => Value::Bool(!left.strict_equals(&right)),
            Lt | LtEq | Gt | GtEq => Value::Bool(Self::compare(&left, &right, expr.op)),
            BitAnd => Value::Number(f64::from(left.to_int32() & right.to_int32())),
            BitOr => Value::Number(f64::from(left.to_int32() | right.to_int32())),
            BitXor => Value::Number(f64::from(left.to_int32() ^ right.to_int32())),
            Shl => Value::Number(f64::from(left.to_int32() << (right.to_uint32() & 31))),
            Shr => Value::Number(f64::from(left.to_int32() >> (right.to_uint32() & 31))),
            UnsignedShr => Value::Number(f64::from(left.to_uint32() >> (right.to_uint32() & 31))),
            In => match &right {
                Value::Object(properties) => {
                    Value::Bool(properties.borrow().contains_key(&left.to_display_string()))
                }
                Value::Array(elements) => {
                    let index = left.to_number();
                    Value::Bool(index >= 0.0 && (index as usize) < elements.borrow().len())
                }
                _ => return Err(EvalError::thrown("TypeError: 'in' needs an object operand")),
            },
            Instanceof => {
                return Err(EvalError::thrown("TypeError: instanceof is outside the sandbox subset"));
            }
            And | Or => unreachable!("handled above"),
        })
    }

    fn compare(left: &Value, right: &Value, op: BinaryOperation) -> bool {
        use BinaryOperation::*;
        if let (Value::Str(a), Value::Str(b)) = (left, right) {
            return match op {
                Lt => a < b,
                LtEq => a <= b,
                Gt => a > b,
                GtEq => a >= b,
                _ => unreachable!("compare is only called for relational operators"),
            };
        }
        let a = left.to_number();
        let b = right.to_number();
        match op {
            Lt => a < b,
            LtEq => a <= b,
            Gt => a > b,
            GtEq => a >= b,
            _ => unreachable!("compare is only called for relational operators"),
        }
    }

    fn eval_assignment(&mut self, expr: &AssignmentExpression, scope: &ScopeRef) -> EvalResult<Value> {
        let value = match expr.op.binary_op() {
            None => self.eval_expression(&expr.value, scope)?,
            Some(op) => {
                let current = self.eval_expression(&expr.target, scope)?;
                let operand = self.eval_expression(&expr.value, scope)?;
                Self::apply_binary_values(op, current, operand)?
            }
        };
        self.assign_to(&expr.target, value.clone(), scope)?;
        Ok(value)
    }

    /// Applies a binary operator to already-evaluated operands; used by the
    /// compound assignments.
    fn apply_binary_values(op: BinaryOperation, left: Value, right: Value) -> EvalResult<Value> {
        use BinaryOperation::*;
        Ok(match op {
            Add => {
                let l = left.to_additive_primitive();
                let r = right.to_additive_primitive();
                if matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)) {
                    Value::string(format!("{}{}", l.to_display_string(), r.to_display_string()))
                } else {
                    Value::Number(l.to_number() + r.to_number())
                }
            }
            Sub => Value::Number(left.to_number() - right.to_number()),
            Mul => Value::Number(left.to_number() * right.to_number()),
            Div => Value::Number(left.to_number() / right.to_number()),
            Mod => Value::Number(left.to_number() % right.to_number()),
            BitAnd => Value::Number(f64::from(left.to_int32() & right.to_int32())),
            BitOr => Value::Number(f64::from(left.to_int32() | right.to_int32())),
            BitXor => Value::Number(f64::from(left.to_int32() ^ right.to_int32())),
            Shl => Value::Number(f64::from(left.to_int32() << (right.to_uint32() & 31))),
            Shr => Value::Number(f64::from(left.to_int32() >> (right.to_uint32() & 31))),
            UnsignedShr => Value::Number(f64::from(left.to_uint32() >> (right.to_uint32() & 31))),
            _ => return Err(EvalError::thrown("TypeError: unsupported compound assignment")),
        })
    }

    fn assign_to(&mut self, target: &Expression, value: Value, scope: &ScopeRef) -> EvalResult<()> {
        match target {
            Expression::Identifier(identifier) => {
                Scope::assign(scope, &identifier.name, value);
                Ok(())
            }
            Expression::Member(member) => {
                let object = self.eval_expression(&member.object, scope)?;
                let key = self.eval_property_key(&member.property, scope)?;
                builtins::set_member(&object, &key, value)
            }
            _ => Err(EvalError::thrown("SyntaxError: invalid assignment target")),
        }
    }

    fn eval_call(&mut self, expr: &CallExpression, scope: &ScopeRef) -> EvalResult<Value> {
        let (callee, this) = match &*expr.callee {
            Expression::Member(member) => {
                let object = self.eval_expression(&member.object, scope)?;
                let key = self.eval_property_key(&member.property, scope)?;
                let callee = builtins::get_member(&object, &key)?;
                (callee, object)
            }
            callee => (self.eval_expression(callee, scope)?, Value::Undefined),
        };

        let mut arguments = Vec::with_capacity(expr.arguments.len());
        for argument in &expr.arguments {
            arguments.push(self.eval_expression(argument, scope)?);
        }

        self.call_value(callee, this, arguments)
    }

    fn eval_new(&mut self, expr: &NewExpression, scope: &ScopeRef) -> EvalResult<Value> {
        let callee = self.eval_expression(&expr.callee, scope)?;
        let mut arguments = Vec::with_capacity(expr.arguments.len());
        for argument in &expr.arguments {
            arguments.push(self.eval_expression(argument, scope)?);
        }

        match &callee {
            Value::Function(_) => {
                let this = Value::object(indexmap::IndexMap::new());
                let result = self.call_value(callee, this.clone(), arguments)?;
                // A constructor returning a reference value overrides `this`.
                Ok(match result {
                    Value::Object(_) | Value::Array(_) | Value::Function(_) => result,
                    _ => this,
                })
            }
            Value::Builtin(_) => self.call_value(callee, Value::Undefined, arguments),
            other => Err(EvalError::thrown(format!("TypeError: {} is not a constructor", other.type_of()))),
        }
    }

    /// Invokes a callable value.
    pub fn call_value(&mut self, callee: Value, this: Value, arguments: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Builtin(builtin) => (builtin.call)(self, this, &arguments),
            Value::Function(closure) => {
                if self.depth >= self.limits.depth_limit {
                    return Err(EvalError::Abort(InterpreterError::RecursionLimitExceeded {
                        limit: self.limits.depth_limit,
                    }));
                }
                self.depth += 1;
                let result = self.call_closure(&closure, this, arguments);
                self.depth -= 1;
                result
            }
            other => Err(EvalError::thrown(format!("TypeError: {} is not a function", other.type_of()))),
        }
    }

    fn call_closure(&mut self, closure: &Rc<Closure>, this: Value, arguments: Vec<Value>) -> EvalResult<Value> {
        let scope = Scope::child(&closure.scope);

        // A named function expression can call itself through its own name.
        if let Some(name) = &closure.name
            && Scope::lookup(&closure.scope, name).is_none()
        {
            Scope::declare(&scope, name.clone(), Value::Function(closure.clone()));
        }

        for (index, param) in closure.params.iter().enumerate() {
            let value = arguments.get(index).cloned().unwrap_or(Value::Undefined);
            Scope::declare(&scope, param.name.clone(), value);
        }
        Scope::declare(&scope, "this", this);
        Scope::declare(&scope, "arguments", Value::array(arguments));

        match &closure.body {
            FunctionBody::Expression(expression) => self.eval_expression(expression, &scope),
            FunctionBody::Block(block) => {
                self.hoist_statements(&block.statements, &scope);
                match self.exec_block(block, &scope)? {
                    Flow::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }
}
