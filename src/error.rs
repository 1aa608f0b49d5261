//! The crate's sole error currency.

use crate::diagnostic::Span;

pub type Result<T> = std::result::Result<T, Error>;

/// Every way evaluating a script can fail.
///
/// Each variant corresponds to one of the named error kinds a host can match
/// on; the `Display` impl (derived by `thiserror`) produces a single-line,
/// greppable message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("name not found: {name}")]
    NameNotFound { name: String, span: Span },

    #[error("type error: {message}")]
    Type { message: String, span: Span },

    #[error("index out of range: {index} (size {size})")]
    IndexOutOfRange {
        index: i64,
        size: usize,
        span: Span,
    },

    #[error("shape error: {message}")]
    Shape { message: String, span: Span },

    #[error("unimplemented operator: {op}")]
    UnimplementedOp { op: String, span: Span },

    #[error("'break'/'continue' outside of a loop")]
    LoopControlOutsideLoop { span: Span },

    #[error("script result is not a boolean")]
    ResultType,

    #[error("malformed encoding: {message}")]
    Encoding { message: String },

    #[error("arena exhausted: requested {requested} bytes, budget {budget}")]
    OutOfMemory { requested: usize, budget: usize },

    #[error("instruction limit exceeded ({limit})")]
    InstructionLimitExceeded { limit: u64 },

    #[error("recursion limit exceeded ({limit})")]
    RecursionLimitExceeded { limit: usize },
}

impl Error {
    pub fn name_not_found(name: impl Into<String>, span: Span) -> Self {
        Error::NameNotFound {
            name: name.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Error::Type {
            message: message.into(),
            span,
        }
    }

    pub fn shape_error(message: impl Into<String>, span: Span) -> Self {
        Error::Shape {
            message: message.into(),
            span,
        }
    }
}
