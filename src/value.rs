//! The closed value family every expression evaluates to.
//!
//! `Rc`/`RefCell` is this crate's shared-ownership primitive, standing in
//! for the reference-counted `Value*` (`raise()`/`drop()`) model of the
//! implementation this was distilled from. A handle may be held by several
//! scope bindings, containers, and iterators at once; storage is reclaimed
//! by ordinary `Rc` drop, not by the arena (the arena only tracks the
//! aggregate live count, see [`crate::arena`]).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};

/// A native callable: a builtin, a host-registered module function, or the
/// `items()` view on a dictionary.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A host-supplied object exposing named members (`import`-bound values).
pub trait Module {
    fn get_member(&self, name: &str) -> Result<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    None,
    Bool,
    Integer,
    Float,
    String,
    List,
    Dictionary,
    Tuple,
    Iterator,
    Range,
    Alias,
    Module,
    Function,
    Builtin,
    DictItems,
}

/// `name [as as_name]`, produced by `Import`/`ImportFrom` evaluation.
#[derive(Debug, Clone)]
pub struct Alias {
    pub name: String,
    pub as_name: Option<String>,
}

impl Alias {
    pub fn binding_name(&self) -> &str {
        self.as_name.as_deref().unwrap_or(&self.name)
    }
}

/// A mutable, reference-shared, ordered sequence.
#[derive(Debug, Clone)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    pub fn new(elements: Vec<Value>) -> Self {
        List(Rc::new(RefCell::new(elements)))
    }

    pub fn append(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    pub fn get(&self, index: i64) -> Option<Value> {
        if index < 0 {
            return None;
        }
        self.0.borrow().get(index as usize).cloned()
    }

    pub fn size(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn contains(&self, needle: &Value) -> bool {
        self.0.borrow().iter().any(|v| equal(v, needle))
    }

    pub fn elements(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Shallow copy: a new list referring to the same child values.
    pub fn duplicate(&self) -> List {
        List::new(self.elements())
    }
}

/// A mutable, insertion-ordered `String -> Value` map. The reference
/// implementation uses a `std::map` (sorted by key); iteration order there
/// is incidental, not semantic, so an insertion-ordered `Vec` is used here
/// instead of pulling in a sorted-map dependency the rest of the pack
/// doesn't otherwise need.
#[derive(Debug, Clone)]
pub struct Dictionary(Rc<RefCell<Vec<(String, Value)>>>);

impl Dictionary {
    pub fn new() -> Self {
        Dictionary(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&self, key: String, value: Value) {
        let mut entries = self.0.borrow_mut();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    pub fn size(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.borrow().clone()
    }

    pub fn duplicate(&self) -> Dictionary {
        let dict = Dictionary::new();
        for (k, v) in self.entries() {
            dict.insert(k, v);
        }
        dict
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator state over a list or a dictionary's values/items.
///
/// The bare `for x in dict` form intentionally iterates dictionary *values*,
/// not keys: the implementation this was distilled from builds its default
/// dictionary iterator over a `std::map` iterator but dereferences it to the
/// mapped value, not the key. That is preserved here rather than "fixed".
#[derive(Debug, Clone)]
pub enum IterState {
    List(List, Rc<Cell<usize>>),
    DictValues(Dictionary, Rc<Cell<usize>>),
    DictItems(Dictionary, Rc<Cell<usize>>),
}

impl IterState {
    pub fn next(&self) -> Option<Value> {
        match self {
            IterState::List(list, pos) => {
                let i = pos.get();
                let v = list.get(i as i64);
                if v.is_some() {
                    pos.set(i + 1);
                }
                v
            }
            IterState::DictValues(dict, pos) => {
                let i = pos.get();
                let entries = dict.entries();
                let v = entries.get(i).map(|(_, v)| v.clone());
                if v.is_some() {
                    pos.set(i + 1);
                }
                v
            }
            IterState::DictItems(dict, pos) => {
                let i = pos.get();
                let entries = dict.entries();
                let v = entries
                    .get(i)
                    .map(|(k, v)| Value::Tuple(Rc::new((Value::String(Rc::from(k.as_str())), v.clone()))));
                if v.is_some() {
                    pos.set(i + 1);
                }
                v
            }
        }
    }
}

/// `range(n)`: a lazy, self-iterating sequence of `0..n` with a fixed step.
/// Only the one-argument form is constructed by the `range` builtin (see
/// [`crate::builtins`]); this type itself is general enough to host a wider
/// form later without changing its shape.
#[derive(Debug, Clone)]
pub struct RangeState {
    current: Rc<Cell<i32>>,
    stop: i32,
    step: i32,
}

impl RangeState {
    pub fn new(start: i32, stop: i32, step: i32) -> Self {
        RangeState {
            current: Rc::new(Cell::new(start)),
            stop,
            step,
        }
    }

    pub fn next(&self) -> Option<Value> {
        let cur = self.current.get();
        if (self.step > 0 && cur >= self.stop) || (self.step < 0 && cur <= self.stop) {
            return None;
        }
        self.current.set(cur + self.step);
        Some(Value::Integer(cur))
    }

    /// An independent cursor over the same bounds, for `duplicate()`.
    pub fn duplicate(&self) -> RangeState {
        RangeState {
            current: Rc::new(Cell::new(self.current.get())),
            stop: self.stop,
            step: self.step,
        }
    }
}

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i32),
    Float(f64),
    String(Rc<str>),
    List(List),
    Dictionary(Dictionary),
    Tuple(Rc<(Value, Value)>),
    Iterator(IterState),
    Range(RangeState),
    Alias(Rc<Alias>),
    Module(Rc<dyn Module>),
    Function(Rc<NativeFn>),
    Builtin(Rc<NativeFn>),
    DictItems(Dictionary),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::List(_) => TypeTag::List,
            Value::Dictionary(_) => TypeTag::Dictionary,
            Value::Tuple(_) => TypeTag::Tuple,
            Value::Iterator(_) => TypeTag::Iterator,
            Value::Range(_) => TypeTag::Range,
            Value::Alias(_) => TypeTag::Alias,
            Value::Module(_) => TypeTag::Module,
            Value::Function(_) => TypeTag::Function,
            Value::Builtin(_) => TypeTag::Builtin,
            Value::DictItems(_) => TypeTag::DictItems,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.type_tag() {
            TypeTag::None => "NoneType",
            TypeTag::Bool => "bool",
            TypeTag::Integer => "int",
            TypeTag::Float => "float",
            TypeTag::String => "str",
            TypeTag::List => "list",
            TypeTag::Dictionary => "dict",
            TypeTag::Tuple => "tuple",
            TypeTag::Iterator => "iterator",
            TypeTag::Range => "range",
            TypeTag::Alias => "alias",
            TypeTag::Module => "module",
            TypeTag::Function => "function",
            TypeTag::Builtin => "builtin",
            TypeTag::DictItems => "dict_items",
        }
    }

    /// The boolean projection used by conditionals and `not`.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::None => false,
            _ => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Builtin(_) | Value::DictItems(_)
        )
    }

    pub fn can_iterate(&self) -> bool {
        matches!(self, Value::List(_) | Value::Dictionary(_))
    }

    /// `true` for values that are already their own iterator (no separate
    /// `iterate()` step).
    pub fn is_generator(&self) -> bool {
        matches!(self, Value::Iterator(_) | Value::Range(_))
    }

    /// Produce an iterator over a `can_iterate` collection. The default view
    /// on a dictionary yields values (see [`IterState`]).
    pub fn iterate(&self) -> Result<Value> {
        match self {
            Value::List(list) => Ok(Value::Iterator(IterState::List(
                list.clone(),
                Rc::new(Cell::new(0)),
            ))),
            Value::Dictionary(dict) => Ok(Value::Iterator(IterState::DictValues(
                dict.clone(),
                Rc::new(Cell::new(0)),
            ))),
            other => Err(Error::type_error(
                format!("'{}' object is not iterable", other.type_name()),
                crate::diagnostic::Span::unknown(),
            )),
        }
    }

    /// Advance a generator value (an iterator or a range) by one step.
    pub fn advance(&self) -> Result<Option<Value>> {
        match self {
            Value::Iterator(state) => Ok(state.next()),
            Value::Range(range) => Ok(range.next()),
            other => Err(Error::type_error(
                format!("'{}' object is not an iterator", other.type_name()),
                crate::diagnostic::Span::unknown(),
            )),
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Value::Function(f) | Value::Builtin(f) => f(args),
            Value::DictItems(dict) => {
                if !args.is_empty() {
                    return Err(Error::type_error(
                        "items() takes no arguments",
                        crate::diagnostic::Span::unknown(),
                    ));
                }
                Ok(Value::Iterator(IterState::DictItems(
                    dict.clone(),
                    Rc::new(Cell::new(0)),
                )))
            }
            other => Err(Error::type_error(
                format!("'{}' object is not callable", other.type_name()),
                crate::diagnostic::Span::unknown(),
            )),
        }
    }

    /// A shallow, independent copy: scalars copy by value, containers
    /// produce a new container sharing their child values, iterators
    /// duplicate their current position.
    pub fn duplicate(&self) -> Value {
        match self {
            Value::List(list) => Value::List(list.duplicate()),
            Value::Dictionary(dict) => Value::Dictionary(dict.duplicate()),
            Value::Range(range) => Value::Range(range.duplicate()),
            Value::Tuple(t) => Value::Tuple(Rc::new((t.0.duplicate(), t.1.duplicate()))),
            other => other.clone(),
        }
    }
}

/// `==`: defined only between two strings or two integers; every other pair
/// (including mismatched types) compares unequal.
pub fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::None, Value::None) => true,
        _ => false,
    }
}

/// `>`: defined only between two integers.
pub fn greater(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Integer(x), Value::Integer(y)) if x > y)
}

/// `>=`: defined only between two integers.
pub fn greater_eq(a: &Value, b: &Value) -> bool {
    matches!((a, b), (Value::Integer(x), Value::Integer(y)) if x >= y)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(list) => write!(f, "{:?}", list.elements()),
            Value::Dictionary(dict) => write!(f, "{:?}", dict.entries()),
            Value::Tuple(t) => write!(f, "({:?}, {:?})", t.0, t.1),
            Value::Iterator(_) => write!(f, "<iterator>"),
            Value::Range(_) => write!(f, "<range>"),
            Value::Alias(a) => write!(f, "<alias {} as {:?}>", a.name, a.as_name),
            Value::Module(_) => write!(f, "<module>"),
            Value::Function(_) => write!(f, "<function>"),
            Value::Builtin(_) => write!(f, "<builtin>"),
            Value::DictItems(_) => write!(f, "<dict_items>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_type_restricted() {
        assert!(equal(&Value::Integer(1), &Value::Integer(1)));
        assert!(!equal(&Value::Integer(1), &Value::Bool(true)));
        assert!(equal(&Value::string("a"), &Value::string("a")));
        assert!(!equal(&Value::string("a"), &Value::Integer(0)));
    }

    #[test]
    fn list_duplicate_is_independent_but_shares_children() {
        let list = List::new(vec![Value::Integer(1)]);
        let copy = list.duplicate();
        copy.append(Value::Integer(2));
        assert_eq!(list.size(), 1);
        assert_eq!(copy.size(), 2);
    }

    #[test]
    fn range_counts_up_with_step() {
        let range = RangeState::new(0, 5, 2);
        let mut seen = Vec::new();
        while let Some(Value::Integer(n)) = range.next() {
            seen.push(n);
        }
        assert_eq!(seen, vec![0, 2, 4]);
    }

    #[test]
    fn dict_default_iteration_yields_values_not_keys() {
        let dict = Dictionary::new();
        dict.insert("a".into(), Value::Integer(1));
        dict.insert("b".into(), Value::Integer(2));
        let iter = Value::Dictionary(dict).iterate().unwrap();
        let mut seen = Vec::new();
        while let Some(v) = iter.advance().unwrap() {
            if let Value::Integer(n) = v {
                seen.push(n);
            }
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
