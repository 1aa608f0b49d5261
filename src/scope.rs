//! The lexical scope chain.
//!
//! Mirrors the reference implementation's `Scope` exactly: `set` walks up to
//! the nearest ancestor that already binds the name and updates it there
//! (write-through), `get` special-cases a handful of reserved names before
//! consulting the chain, and a scope can be `terminate`d by a `return`,
//! after which the statement list executing it stops evaluating further
//! siblings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostic::Span;
use crate::error::{Error, Result};
use crate::value::Value;

/// Shared sink for the `print` builtin, drained by a host via
/// `Interpreter::print_output`.
pub type OutputSink = Rc<RefCell<Vec<String>>>;

struct Inner {
    parent: Option<Scope>,
    values: RefCell<HashMap<String, Value>>,
    terminated: RefCell<bool>,
    result: RefCell<Value>,
    output: OutputSink,
}

/// A cheaply cloneable handle to one frame in the scope chain.
#[derive(Clone)]
pub struct Scope(Rc<Inner>);

impl Scope {
    pub fn root_with_output(output: OutputSink) -> Self {
        Scope(Rc::new(Inner {
            parent: None,
            values: RefCell::new(HashMap::new()),
            terminated: RefCell::new(false),
            result: RefCell::new(Value::None),
            output,
        }))
    }

    pub fn root() -> Self {
        Self::root_with_output(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn child(&self) -> Self {
        Scope(Rc::new(Inner {
            parent: Some(self.clone()),
            values: RefCell::new(HashMap::new()),
            terminated: RefCell::new(false),
            result: RefCell::new(Value::None),
            output: self.0.output.clone(),
        }))
    }

    fn has_local(&self, name: &str) -> bool {
        self.0.values.borrow().contains_key(name)
    }

    /// Recursive existence check used by `set` to find the write-through target.
    pub fn has(&self, name: &str) -> bool {
        if self.has_local(name) {
            return true;
        }
        match &self.0.parent {
            Some(parent) => parent.has(name),
            None => false,
        }
    }

    /// Reserved names resolved before any scope lookup, matching the
    /// reference implementation's `get_value` special cases.
    fn reserved(&self, name: &str) -> Option<Value> {
        match name {
            "None" => Some(Value::None),
            "range" => Some(Value::Builtin(Rc::new(crate::builtins::range_builtin))),
            "int" => Some(Value::Builtin(Rc::new(crate::builtins::int_builtin))),
            "str" => Some(Value::Builtin(Rc::new(crate::builtins::str_builtin))),
            "print" => Some(Value::Builtin(crate::builtins::print_builtin(
                self.0.output.clone(),
            ))),
            _ => None,
        }
    }

    pub fn get(&self, name: &str, span: Span) -> Result<Value> {
        if let Some(v) = self.reserved(name) {
            return Ok(v);
        }
        if let Some(v) = self.0.values.borrow().get(name) {
            return Ok(v.clone());
        }
        match &self.0.parent {
            Some(parent) => parent.get(name, span),
            None => Err(Error::name_not_found(name, span)),
        }
    }

    /// Write-through: if an ancestor already binds `name`, update it there;
    /// otherwise bind `name` locally.
    pub fn set(&self, name: &str, value: Value) {
        if let Some(parent) = &self.0.parent {
            if parent.has(name) {
                parent.set(name, value);
                return;
            }
        }
        self.0.values.borrow_mut().insert(name.to_string(), value);
    }

    pub fn terminate(&self, result: Value) {
        *self.0.result.borrow_mut() = result;
        *self.0.terminated.borrow_mut() = true;
    }

    pub fn is_terminated(&self) -> bool {
        *self.0.terminated.borrow()
    }

    pub fn result(&self) -> Value {
        self.0.result.borrow().clone()
    }

    pub fn output(&self) -> OutputSink {
        self.0.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_through_updates_ancestor() {
        let root = Scope::root();
        root.set("x", Value::Integer(1));
        let child = root.child();
        child.set("x", Value::Integer(2));
        assert!(!child.has_local("x"));
        assert_eq!(root.get("x", Span::unknown()).unwrap().type_name(), "int");
    }

    #[test]
    fn unbound_name_is_local_to_child() {
        let root = Scope::root();
        let child = root.child();
        child.set("y", Value::Integer(5));
        assert!(child.has_local("y"));
        assert!(!root.has("y"));
    }

    #[test]
    fn reserved_names_resolve_before_chain() {
        let root = Scope::root();
        let v = root.get("range", Span::unknown()).unwrap();
        assert!(v.is_callable());
    }
}
