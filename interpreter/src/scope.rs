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

use crate::value::Value;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub type ScopeRef = Rc<RefCell<Scope>>;

/// One frame of the scope chain. Closures keep their defining frame alive
/// through the `parent` handle.
pub struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn root() -> ScopeRef {
        Rc::new(RefCell::new(Self { bindings: HashMap::new(), parent: None }))
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self { bindings: HashMap::new(), parent: Some(parent.clone()) }))
    }

    /// Declares `name` in this frame, shadowing any outer binding.
    pub fn declare(scope: &ScopeRef, name: impl Into<String>, value: Value) {
        scope.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Is `name` bound in this frame itself?
    pub fn declared_locally(scope: &ScopeRef, name: &str) -> bool {
        scope.borrow().bindings.contains_key(name)
    }

    /// Reads `name` from the innermost frame that binds it.
    pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
        let mut current = scope.clone();
        loop {
            if let Some(value) = current.borrow().bindings.get(name) {
                return Some(value.clone());
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Writes `name` in the innermost frame that binds it. An assignment to
    /// an undeclared name creates a global, as sloppy-mode source does.
    pub fn assign(scope: &ScopeRef, name: &str, value: Value) {
        let mut current = scope.clone();
        loop {
            if current.borrow().bindings.contains_key(name) {
                current.borrow_mut().bindings.insert(name.to_string(), value);
                return;
            }
            let parent = current.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => {
                    current.borrow_mut().bindings.insert(name.to_string(), value);
                    return;
                }
            }
        }
    }
}
