//! A small, embeddable interpreter for a strict subset of a dynamically
//! typed, indentation-structured scripting language, aimed at policy-style
//! predicate scripts: short scripts that inspect host-supplied data and
//! return a single boolean verdict.
//!
//! # Supported language subset
//!
//! ## Types
//! `None`, `bool`, `int` (32-bit), `float` (exists, no operators), `str`,
//! `list`, `dict` (string keys), 2-tuples.
//!
//! ## Operators
//! `+`/`-` (int, and `+` on str), comparisons (`==`, `!=`, `<`, `<=`, `>`,
//! `>=`, `in`, `not in`), `and`/`or`, unary `not`/`-`.
//!
//! ## Control flow
//! `if`/`elif`/`else`, `for` (over lists, dict values/items, `range`),
//! `while`, `break`, `continue`, `return`, `+=`.
//!
//! ## Built-ins
//! `range(n)`, `int()`, `str()`, `print()`, plus the `rand` module
//! (`randint(low, high)`, inclusive) and whatever else a host registers via
//! [`Interpreter::set_module`].
//!
//! # Not supported
//!
//! `def`, classes, `try`/`except`, comprehensions, slices, keyword
//! arguments, `*`/`/`/`%`/`**`/bitwise operators (parsed, rejected at
//! evaluation as unimplemented), async, any I/O beyond `print`.
//!
//! # Quick start
//!
//! ```
//! use verdict::{compile_code, Interpreter};
//!
//! let encoding = compile_code(r#"
//! total = 0
//! for n in numbers:
//!     total += n
//! total > 10
//! "#).unwrap();
//!
//! let interp = Interpreter::new(encoding);
//! interp.set_list("numbers", vec!["3".into(), "4".into(), "5".into()]);
//! ```

mod arena;
mod builtins;
mod compiler;
mod diagnostic;
mod encoding;
mod error;
mod eval;
mod modules;
mod scope;
mod value;

#[cfg(feature = "serde")]
mod document;

pub use compiler::compile_source as compile_code;
pub use diagnostic::Span;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use eval::{Interpreter, Limits};
pub use value::{Alias, Dictionary, List, Module, TypeTag, Value};

#[cfg(feature = "serde")]
pub use document::{value_to_document, Document};

use std::path::Path;

/// Read a script from disk and compile it the same way [`compile_code`] does.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Encoding> {
    let source = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Parse {
        message: format!("could not read {}: {e}", path.as_ref().display()),
    })?;
    compile_code(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_predicate_evaluates() {
        let encoding = compile_code("1 + 1 == 2").unwrap();
        let interp = Interpreter::new(encoding);
        assert!(interp.execute().unwrap());
    }

    #[test]
    fn non_boolean_result_is_an_error() {
        let encoding = compile_code("1 + 1").unwrap();
        let interp = Interpreter::new(encoding);
        assert!(matches!(interp.execute(), Err(Error::ResultType)));
    }
}
