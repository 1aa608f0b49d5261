//! The four names a scope resolves specially rather than storing as
//! ordinary bindings: `range`, `int`, `str`, and `print`.

use std::rc::Rc;

use tracing::info;

use crate::diagnostic::Span;
use crate::error::Error;
use crate::scope::OutputSink;
use crate::value::{NativeFn, RangeState, Value};

pub fn range_builtin(args: &[Value]) -> crate::error::Result<Value> {
    match args {
        [Value::Integer(n)] => Ok(Value::Range(RangeState::new(0, *n, 1))),
        [other] => Err(Error::type_error(
            format!("range() requires an int, got '{}'", other.type_name()),
            Span::unknown(),
        )),
        _ => Err(Error::type_error(
            format!("range() takes exactly 1 argument ({} given)", args.len()),
            Span::unknown(),
        )),
    }
}

pub fn int_builtin(args: &[Value]) -> crate::error::Result<Value> {
    match args {
        [Value::Integer(n)] => Ok(Value::Integer(*n)),
        [Value::String(s)] => s
            .trim()
            .parse::<i32>()
            .map(Value::Integer)
            .map_err(|_| Error::type_error(format!("invalid literal for int(): '{s}'"), Span::unknown())),
        [other] => Err(Error::type_error(
            format!("int() requires an int or str, got '{}'", other.type_name()),
            Span::unknown(),
        )),
        _ => Err(Error::type_error(
            format!("int() takes exactly 1 argument ({} given)", args.len()),
            Span::unknown(),
        )),
    }
}

pub fn str_builtin(args: &[Value]) -> crate::error::Result<Value> {
    match args {
        [Value::String(s)] => Ok(Value::String(s.clone())),
        [Value::Integer(n)] => Ok(Value::string(n.to_string().as_str())),
        [other] => Err(Error::type_error(
            format!("str() requires an int or str, got '{}'", other.type_name()),
            Span::unknown(),
        )),
        _ => Err(Error::type_error(
            format!("str() takes exactly 1 argument ({} given)", args.len()),
            Span::unknown(),
        )),
    }
}

/// `print` both emits a structured `tracing` event and appends to the
/// per-interpreter capture buffer a host can read back via
/// `Interpreter::print_output`.
pub fn print_builtin(output: OutputSink) -> Rc<NativeFn> {
    Rc::new(move |args: &[Value]| match args {
        [Value::String(s)] => {
            info!(target: "script_output", message = %s);
            output.borrow_mut().push(s.to_string());
            Ok(Value::None)
        }
        [other] => Err(Error::type_error(
            format!("print() requires a str, got '{}'", other.type_name()),
            Span::unknown(),
        )),
        _ => Err(Error::type_error(
            format!("print() takes exactly 1 argument ({} given)", args.len()),
            Span::unknown(),
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_of_str_round_trips() {
        let s = str_builtin(&[Value::Integer(42)]).unwrap();
        let n = int_builtin(std::slice::from_ref(&s)).unwrap();
        assert!(matches!(n, Value::Integer(42)));
    }

    #[test]
    fn range_rejects_wrong_arity() {
        assert!(range_builtin(&[Value::Integer(1), Value::Integer(2)]).is_err());
    }
}
