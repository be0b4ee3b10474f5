//! Native primitives: `+`, `-`, `<`, `>`.
//!
//! Each one reduces over its whole argument list.

use rhizome_bramble_ir::NATIVE_OPERATORS;

use crate::EvalError;
use crate::value::{Function, Native, Value};

/// Bindings for every native operator, for seeding a global frame.
pub fn native_primitives() -> Vec<(&'static str, Value)> {
    NATIVE_OPERATORS
        .iter()
        .filter_map(|&name| {
            primitive(name).map(|native| (name, Value::Function(Function::Native(native))))
        })
        .collect()
}

fn primitive(name: &str) -> Option<Native> {
    match name {
        "+" => Some(Native::new(name, add)),
        "-" => Some(Native::new(name, subtract)),
        "<" => Some(Native::new(name, |args| Ok(Value::Bool(monotonic(args, less))))),
        ">" => Some(Native::new(name, |args| {
            Ok(Value::Bool(monotonic(args, |a, b| less(b, a))))
        })),
        _ => None,
    }
}

fn add(args: &[Value]) -> Result<Value, EvalError> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(Value::Undefined);
    };
    Ok(rest.iter().fold(first.clone(), |acc, arg| plus(&acc, arg)))
}

fn subtract(args: &[Value]) -> Result<Value, EvalError> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(Value::Undefined);
    };
    Ok(rest.iter().fold(first.clone(), |acc, arg| {
        Value::Number(acc.to_number() - arg.to_number())
    }))
}

/// Binary `+`: concatenation if either side converts to a string,
/// numeric addition otherwise.
fn plus(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
        _ if a.is_stringish() || b.is_stringish() => Value::Str(format!("{}{}", a, b)),
        _ => Value::Number(a.to_number() + b.to_number()),
    }
}

/// Binary `<`. Strings compare lexicographically; anything else
/// numerically, where NaN is unordered.
fn less(a: &Value, b: &Value) -> bool {
    if a.is_stringish() && b.is_stringish() {
        a.to_string() < b.to_string()
    } else {
        a.to_number() < b.to_number()
    }
}

/// True iff every adjacent pair is ordered by `ordered`.
fn monotonic(args: &[Value], ordered: impl Fn(&Value, &Value) -> bool) -> bool {
    args.windows(2).all(|pair| ordered(&pair[0], &pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Value {
        primitive(name).unwrap().call(args).unwrap()
    }

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn test_table_covers_every_operator() {
        let names: Vec<_> = native_primitives().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, NATIVE_OPERATORS);
    }

    #[test]
    fn test_add() {
        assert_eq!(call("+", &nums(&[1.0, 2.0, 3.0])), Value::Number(6.0));
        assert_eq!(call("+", &nums(&[4.0])), Value::Number(4.0));
        assert_eq!(call("+", &[]), Value::Undefined);
        assert_eq!(
            call("+", &[Value::str("some strings"), Value::str(" are long")]),
            Value::str("some strings are long")
        );
        assert_eq!(
            call("+", &[Value::Number(1.0), Value::Number(2.0), Value::str("x")]),
            Value::str("3x")
        );
        assert_eq!(
            call("+", &[Value::Bool(true), Value::Null]),
            Value::Number(1.0)
        );
    }

    #[test]
    fn test_subtract() {
        assert_eq!(call("-", &nums(&[10.0, 3.0, 2.0])), Value::Number(5.0));
        assert_eq!(call("-", &nums(&[5.0])), Value::Number(5.0));
        assert_eq!(
            call("-", &[Value::str("7"), Value::Number(2.0)]),
            Value::Number(5.0)
        );
        match call("-", &[Value::Undefined, Value::Number(1.0)]) {
            Value::Number(n) => assert!(n.is_nan()),
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_comparisons_are_monotonic() {
        assert_eq!(call("<", &nums(&[1.0, 2.0, 3.0])), Value::Bool(true));
        assert_eq!(call("<", &nums(&[1.0, 3.0, 2.0])), Value::Bool(false));
        assert_eq!(call("<", &nums(&[1.0, 1.0])), Value::Bool(false));
        assert_eq!(call(">", &nums(&[3.0, 2.0, 1.0])), Value::Bool(true));
        assert_eq!(call(">", &nums(&[3.0, 1.0, 2.0])), Value::Bool(false));
        assert_eq!(call("<", &nums(&[1.0])), Value::Bool(true));
        assert_eq!(call("<", &[]), Value::Bool(true));
    }

    #[test]
    fn test_comparison_coercion() {
        assert_eq!(
            call("<", &[Value::str("apple"), Value::str("banana")]),
            Value::Bool(true)
        );
        assert_eq!(
            call("<", &[Value::str("10"), Value::Number(9.0)]),
            Value::Bool(false)
        );
        assert_eq!(
            call("<", &[Value::Number(f64::NAN), Value::Number(1.0)]),
            Value::Bool(false)
        );
    }
}
