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

//! Shared syntactic judgments: callee name resolution and initializer
//! contexts. Several passes must agree on these exactly, so they live in one
//! place.

use crate::common::reserved::is_reserved_property;

use dejs_ast::{CallExpression, Expression, MemberProperty, Statement};

/// Resolves the name a call resolves its callee through: a plain identifier,
/// or a member access whose property is a non-reserved identifier. Calls
/// through computed properties or reserved words have no helper name.
pub fn resolve_callee_name(call: &CallExpression) -> Option<&str> {
    match &*call.callee {
        Expression::Identifier(identifier) => Some(&identifier.name),
        Expression::Member(member) => match &member.property {
            MemberProperty::Identifier(name) if !is_reserved_property(&name.name) => Some(&name.name),
            _ => None,
        },
        _ => None,
    }
}

/// Is this call an immediately-invoked function literal?
pub fn is_immediate_call(call: &CallExpression) -> bool {
    matches!(&*call.callee, Expression::Function(_) | Expression::Arrow(_))
}

/// Is this statement an initializer block: an immediately-invoked function
/// statement, a `do`/`while` loop, or a structured error-handling block?
/// These regions run at load time for their side effects, so calls inside
/// them are excluded from rewriting.
pub fn is_initializer_statement(statement: &Statement) -> bool {
    match statement {
        Statement::Expression(stmt) => match &stmt.expression {
            Expression::Call(call) => is_immediate_call(call),
            _ => false,
        },
        Statement::DoWhile(_) | Statement::While(_) | Statement::Try(_) => true,
        _ => false,
    }
}
