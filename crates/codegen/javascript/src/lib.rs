//! JavaScript code generation for Bramble.
//!
//! Walks the same syntax tree the evaluator runs and emits equivalent
//! JavaScript: evaluating the emitted code computes what the evaluator
//! computes.

mod codegen;

pub use codegen::{CodegenError, codegen, codegen_indented};
