//! Serializing values to a host-facing document tree, gated behind the
//! `serde` feature since a host may not always need it.

use crate::diagnostic::Span;
use crate::error::{Error, Result};
use crate::value::Value;

pub type Document = serde_json::Value;

/// Recursively converts the document-shaped subset of `Value`
/// (`dict`/`list`/`str`/`int`) into a [`Document`]. Every other variant
/// fails: callables, modules, and iterators have no document representation.
///
/// The reference implementation's own `value_to_bdoc` pairs a list's
/// `start_array` with `end_map` — read as a copy-paste bug, not reproduced
/// here; lists close with `end_array`.
pub fn value_to_document(value: &Value) -> Result<Document> {
    match value {
        Value::None => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Integer(n) => Ok(serde_json::Value::Number((*n).into())),
        Value::String(s) => Ok(serde_json::Value::String(s.to_string())),
        Value::List(list) => {
            let mut items = Vec::with_capacity(list.size());
            for element in list.elements() {
                items.push(value_to_document(&element)?);
            }
            Ok(serde_json::Value::Array(items))
        }
        Value::Dictionary(dict) => {
            let mut map = serde_json::Map::new();
            for (k, v) in dict.entries() {
                map.insert(k, value_to_document(&v)?);
            }
            Ok(serde_json::Value::Object(map))
        }
        other => Err(Error::type_error(
            format!("'{}' has no document representation", other.type_name()),
            Span::unknown(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Dictionary, List};

    #[test]
    fn converts_nested_structures() {
        let list = List::new(vec![Value::Integer(1), Value::Integer(2)]);
        let dict = Dictionary::new();
        dict.insert("values".into(), Value::List(list));
        let doc = value_to_document(&Value::Dictionary(dict)).unwrap();
        assert_eq!(doc["values"][0], 1);
        assert_eq!(doc["values"][1], 2);
    }

    #[test]
    fn callables_have_no_document_form() {
        assert!(value_to_document(&Value::Builtin(std::rc::Rc::new(|_: &[Value]| {
            Ok(Value::None)
        })))
        .is_err());
    }
}
