//! Runtime values.

use rhizome_bramble_ir::{Expr, format_number};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::EvalError;
use crate::env::Env;

/// Signature of functions implemented in Rust.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError>;

/// A value produced by evaluation.
///
/// Conversions (truthiness, string and number coercion) follow the
/// JavaScript rules, so that evaluated programs agree with the code the
/// JavaScript generator emits for them.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Produced by quoting a list.
    List(Vec<Value>),
    Function(Function),
    Object(Rc<Object>),
}

impl Value {
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn native(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        Value::Function(Function::Native(Native::new(name, func)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::List(_) | Value::Function(_) | Value::Object(_) => true,
        }
    }

    /// Whether this value converts to a string rather than a number when
    /// used as an operand.
    pub(crate) fn is_stringish(&self) -> bool {
        matches!(
            self,
            Value::Str(_) | Value::List(_) | Value::Function(_) | Value::Object(_)
        )
    }

    /// Numeric conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Str(s) => parse_numeric(s),
            Value::List(_) | Value::Function(_) | Value::Object(_) => {
                parse_numeric(&self.to_string())
            }
        }
    }

    /// Convert to JSON for display. Functions and objects become their
    /// string form; undefined becomes null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Function(_) | Value::Object(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

fn parse_numeric(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// String conversion.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    // Nested undefined/null print as empty.
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Function(func) => write!(f, "{}", func),
            Value::Object(obj) => write!(f, "[object {}]", obj.name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// A callable value.
#[derive(Debug, Clone)]
pub enum Function {
    Native(Native),
    Closure(Rc<Closure>),
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native(a), Function::Native(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Function::Closure(a), Function::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native(native) => {
                write!(f, "function {}() {{ [native code] }}", native.name)
            }
            Function::Closure(closure) => {
                write!(f, "function({}) {{ ", closure.params.join(", "))?;
                for expr in &closure.body {
                    write!(f, "{} ", expr)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A function implemented in Rust.
#[derive(Clone)]
pub struct Native {
    name: String,
    func: Rc<NativeFn>,
}

impl Native {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    ) -> Self {
        Native {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Native").field(&self.name).finish()
    }
}

/// A function value created by `fun`.
///
/// Holds the frame that was active when the `fun` form was evaluated; each
/// call runs the body in a fresh child of that frame.
pub struct Closure {
    pub params: Vec<String>,
    pub body: Vec<Expr>,
    pub env: Env,
}

impl fmt::Debug for Closure {
    // The captured frame may reach this closure again, so it is not printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// A named bag of members provided by the host (e.g. `console`).
#[derive(Debug)]
pub struct Object {
    name: String,
    members: HashMap<String, Value>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Object {
            name: name.into(),
            members: HashMap::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }
}
