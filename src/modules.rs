//! Built-in host modules.
//!
//! `rand` is the one module this crate ships on its own: `randint` requires
//! exactly two arguments and returns a value uniformly distributed over the
//! *inclusive* range `[low, high]`. Anything beyond
//! that (a `math`/`json`-style module, say) is left to the host, registered
//! via [`crate::eval::Interpreter::set_module`].

use rand::Rng;

use crate::diagnostic::Span;
use crate::error::Error;
use crate::value::{Module, Value};

pub struct RandModule;

impl Module for RandModule {
    fn get_member(&self, name: &str) -> crate::error::Result<Value> {
        match name {
            "randint" => Ok(Value::Function(std::rc::Rc::new(randint))),
            other => Err(Error::name_not_found(other, Span::unknown())),
        }
    }
}

fn randint(args: &[Value]) -> crate::error::Result<Value> {
    if args.len() != 2 {
        return Err(Error::type_error(
            format!("randint() takes 2 arguments ({} given)", args.len()),
            Span::unknown(),
        ));
    }
    let low = as_int(&args[0])?;
    let high = as_int(&args[1])?;
    if low > high {
        return Err(Error::type_error(
            "randint() low must be <= high",
            Span::unknown(),
        ));
    }
    let value = rand::thread_rng().gen_range(low..=high);
    Ok(Value::Integer(value))
}

fn as_int(value: &Value) -> crate::error::Result<i32> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(Error::type_error(
            format!("expected int, got '{}'", other.type_name()),
            Span::unknown(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randint_is_inclusive() {
        for _ in 0..50 {
            let v = randint(&[Value::Integer(1), Value::Integer(1)]).unwrap();
            assert!(matches!(v, Value::Integer(1)));
        }
    }

    #[test]
    fn randint_rejects_wrong_arity() {
        assert!(randint(&[Value::Integer(1)]).is_err());
    }
}
