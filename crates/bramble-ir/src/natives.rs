//! Native operator names.

/// Operators preloaded into every global environment.
///
/// Code generators emit calls to these as infix expressions.
pub const NATIVE_OPERATORS: &[&str] = &[
    "+", // Addition / concatenation
    "-", // Subtraction
    "<", // Strictly increasing
    ">", // Strictly decreasing
];

/// Returns true if `name` is a native operator.
pub fn is_native_operator(name: &str) -> bool {
    NATIVE_OPERATORS.contains(&name)
}
