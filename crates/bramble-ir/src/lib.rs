//! S-expression reader and AST for Bramble.
//!
//! This crate defines the syntax tree shared by the evaluator
//! (`rhizome-bramble-runtime`) and the code generators.
//!
//! # Surface syntax
//!
//! A program is a list form. `(` and `[` open a list, `)` and `]` close one,
//! and any opener accepts any closer. Atoms are strings, numbers and symbols:
//!
//! ```text
//! (do
//!   (def greet (fun [name] (+ "hello " name)))
//!   (greet "world"))
//! ```
//!
//! Consumers should not re-test head symbols themselves; [`Expr::form`]
//! classifies a node once into a [`Form`].

mod expr;
mod form;
mod natives;
mod reader;

pub use expr::{Atom, Expr, Symbol, format_number};
pub use form::{Form, FormError, SpecialForm};
pub use natives::{NATIVE_OPERATORS, is_native_operator};
pub use reader::{ReadError, parse, parse_all};
