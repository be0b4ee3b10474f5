//! Tree-walking evaluator for Bramble.
//!
//! Runs a syntax tree from `rhizome-bramble-ir` directly against a scope
//! chain of [`Env`] frames. Everything outside the core language (objects
//! reachable through dot-calls, `require`) comes from a [`Host`].
//!
//! ```
//! use rhizome_bramble_runtime::{Interpreter, Value};
//!
//! let interpreter = Interpreter::default();
//! let value = interpreter.read("((fun [x] (+ x 1)) 1)").unwrap();
//! assert_eq!(value, Value::Number(2.0));
//! ```

mod env;
mod host;
mod interpreter;
mod natives;
mod value;

pub use env::Env;
pub use host::{ConsoleBuffer, Host, StdHost};
pub use interpreter::Interpreter;
pub use natives::native_primitives;
pub use value::{Closure, Function, Native, Object, Value};

use rhizome_bramble_ir::{FormError, ReadError};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    #[error("malformed form: {0}")]
    Form(#[from] FormError),

    #[error("{0} is not defined")]
    Name(String),

    #[error("{0} is not a function")]
    NotAFunction(String),

    #[error("{receiver} has no member {member}")]
    UnknownMember { receiver: String, member: String },

    #[error("host error: {0}")]
    Host(String),
}

#[cfg(test)]
mod tests;
