//! Lexical scope chain.
//!
//! Each [`Env`] is a handle to one frame of bindings plus its enclosing
//! frame. Handles are reference counted: a frame lives as long as the
//! longest holder, either a call still on the stack or a closure that
//! captured it. Single-threaded only.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

struct Frame {
    bindings: HashMap<String, Value>,
    outer: Option<Env>,
}

/// A handle to a scope frame.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    /// Create an empty outermost frame.
    pub fn new() -> Self {
        Env(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            outer: None,
        })))
    }

    /// Create an empty frame whose enclosing frame is `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            outer: Some(self.clone()),
        })))
    }

    /// The nearest frame (this one or an ancestor) binding `name`.
    pub fn find(&self, name: &str) -> Option<Env> {
        let mut current = self.clone();
        loop {
            let outer = {
                let frame = current.0.borrow();
                if frame.bindings.contains_key(name) {
                    break;
                }
                frame.outer.clone()
            };
            current = outer?;
        }
        Some(current)
    }

    /// Value bound to `name` in the nearest defining frame.
    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.find(name)?;
        let value = frame.0.borrow().bindings.get(name).cloned();
        value
    }

    /// Overwrite `name` where it is bound, or bind it in this frame if it
    /// is unbound everywhere.
    pub fn set(&self, name: &str, value: Value) {
        let target = self.find(name).unwrap_or_else(|| self.clone());
        target.define(name, value);
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(name.to_string(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Bind every entry in this frame.
    pub fn load<K, I>(&self, entries: I) -> &Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (name, value) in entries {
            self.define(name.as_ref(), value);
        }
        self
    }

    /// Whether `self` and `other` are handles to the same frame.
    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<_> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("outer", &frame.outer)
            .finish()
    }
}
