//! Host capabilities.
//!
//! The interpreter knows nothing about the embedding beyond this trait:
//! which globals to seed, how `require` finds a module, and how a dot-call
//! finds a member on its receiver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::EvalError;
use crate::value::{Object, Value};

/// Capabilities an embedding provides to the interpreter.
pub trait Host {
    /// Bindings seeded into every fresh global environment.
    fn globals(&self) -> Vec<(String, Value)>;

    /// Resolve a module for `(require "name")`.
    fn require(&self, name: &str) -> Result<Value, EvalError>;

    /// Resolve `receiver.name` for a dot-call. The returned callable must
    /// already be bound to `receiver`.
    fn resolve_member(&self, receiver: &Value, name: &str) -> Result<Value, EvalError> {
        let member = match receiver {
            Value::Object(object) => object.member(name).cloned(),
            _ => None,
        };
        member.ok_or_else(|| EvalError::UnknownMember {
            receiver: receiver.to_string(),
            member: name.to_string(),
        })
    }
}

/// Lines written by a captured console.
pub type ConsoleBuffer = Rc<RefCell<Vec<String>>>;

/// The standard host: a `console` object, the JavaScript value globals
/// (`true`, `false`, `null`, `undefined`, `NaN`, `Infinity`), and a set of
/// registered modules for `require`.
pub struct StdHost {
    console: Rc<Object>,
    modules: HashMap<String, Value>,
}

impl StdHost {
    /// A host whose `console.log` writes to stdout.
    pub fn new() -> Self {
        let log = Value::native("log", |args| {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", join_args(args))
                .map_err(|e| EvalError::Host(e.to_string()))?;
            Ok(Value::Undefined)
        });
        Self::with_console(log)
    }

    /// A host whose `console.log` appends to the returned buffer.
    pub fn capture() -> (Self, ConsoleBuffer) {
        let buffer = ConsoleBuffer::default();
        let sink = buffer.clone();
        let log = Value::native("log", move |args| {
            sink.borrow_mut().push(join_args(args));
            Ok(Value::Undefined)
        });
        (Self::with_console(log), buffer)
    }

    fn with_console(log: Value) -> Self {
        StdHost {
            console: Rc::new(Object::new("console").with_member("log", log)),
            modules: HashMap::new(),
        }
    }

    /// Register a module reachable through `require`.
    pub fn with_module(mut self, name: impl Into<String>, module: Value) -> Self {
        self.modules.insert(name.into(), module);
        self
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for StdHost {
    fn globals(&self) -> Vec<(String, Value)> {
        vec![
            ("console".to_string(), Value::Object(self.console.clone())),
            ("true".to_string(), Value::Bool(true)),
            ("false".to_string(), Value::Bool(false)),
            ("null".to_string(), Value::Null),
            ("undefined".to_string(), Value::Undefined),
            ("NaN".to_string(), Value::Number(f64::NAN)),
            ("Infinity".to_string(), Value::Number(f64::INFINITY)),
        ]
    }

    fn require(&self, name: &str) -> Result<Value, EvalError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Host(format!("cannot find module '{}'", name)))
    }
}

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
