//! Tests for bramble-runtime.

use crate::{EvalError, Interpreter, Object, StdHost, Value};
use rhizome_bramble_ir::{FormError, SpecialForm, parse};
use std::rc::Rc;

fn read(source: &str) -> Result<Value, EvalError> {
    Interpreter::default().read(source)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_atoms_evaluate_to_themselves() {
    assert_eq!(read("(do 3.5)").unwrap(), num(3.5));
    assert_eq!(read(r#"(do "text")"#).unwrap(), Value::str("text"));
}

#[test]
fn test_arithmetic() {
    assert_eq!(read("(+ 1 2)").unwrap(), num(3.0));
    assert_eq!(read("(+ (- 3 2) 2)").unwrap(), num(3.0));
    assert_eq!(
        read(r#"(+ "some strings" " are long")"#).unwrap(),
        Value::str("some strings are long")
    );
}

#[test]
fn test_comparison_chains() {
    assert_eq!(read("(< 1 2 3)").unwrap(), Value::Bool(true));
    assert_eq!(read("(< 1 3 2)").unwrap(), Value::Bool(false));
    assert_eq!(read("(> 3 2 1)").unwrap(), Value::Bool(true));
}

#[test]
fn test_comparison_operands_evaluate_once_in_order() {
    let (host, console) = StdHost::capture();
    let interpreter = Interpreter::new(host);
    let value = interpreter
        .read(r#"(< (.log console "a") 2 1 (.log console "b"))"#)
        .unwrap();
    assert_eq!(value, Value::Bool(false));
    assert_eq!(*console.borrow(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_large_and_small_numbers_print_in_exponent_form() {
    assert_eq!(
        read(r#"(+ "n" 1000000000000000000000)"#).unwrap(),
        Value::str("n1e+21")
    );
    assert_eq!(
        read(r#"(+ "n" 0.0000001)"#).unwrap(),
        Value::str("n1e-7")
    );
}

#[test]
fn test_if() {
    assert_eq!(read("(if (< 10 20) (+ 1 1) (+ 3 3))").unwrap(), num(2.0));
    assert_eq!(read("(if (> 10 20) (+ 1 1) (+ 3 3))").unwrap(), num(6.0));
    assert_eq!(read("(if (> 10 20) 1)").unwrap(), Value::Undefined);
}

#[test]
fn test_if_truthiness() {
    assert_eq!(read("(if 0 1 2)").unwrap(), num(2.0));
    assert_eq!(read(r#"(if "x" 1 2)"#).unwrap(), num(1.0));
    assert_eq!(read("(if missing 1 2)").unwrap(), num(2.0));
    assert_eq!(read("(if (quote (a)) 1 2)").unwrap(), num(1.0));
    assert_eq!(read("(if false 1 2)").unwrap(), num(2.0));
}

#[test]
fn test_if_only_evaluates_taken_branch() {
    let (host, console) = StdHost::capture();
    let interpreter = Interpreter::new(host);
    interpreter
        .read(r#"(if 1 (.log console "then") (.log console "else"))"#)
        .unwrap();
    assert_eq!(*console.borrow(), vec!["then".to_string()]);
}

#[test]
fn test_quote() {
    assert_eq!(read(r#"(quote "a string")"#).unwrap(), Value::str("a string"));
    assert_eq!(read("(quote foo)").unwrap(), Value::str("foo"));
    assert_eq!(read("(quote 5)").unwrap(), Value::str("5"));
    assert_eq!(
        read("(quote (a b (c 1)))").unwrap(),
        Value::List(vec![Value::str("a"), Value::str("b"), Value::str("c,1")])
    );
}

#[test]
fn test_def_returns_undefined() {
    assert_eq!(read(r#"(def foo "bar")"#).unwrap(), Value::Undefined);
}

#[test]
fn test_def_and_set() {
    assert_eq!(
        read(r#"(do (def foo "bar") (set! foo "baz"))"#).unwrap(),
        Value::str("baz")
    );
    assert_eq!(
        read(r#"(do (def foo "foo") (+ foo "bar"))"#).unwrap(),
        Value::str("foobar")
    );
}

#[test]
fn test_set_unbound_is_a_name_error() {
    let err = read(r#"(set! foo "baz")"#).unwrap_err();
    assert!(matches!(&err, EvalError::Name(name) if name == "foo"));

    // The value is never evaluated.
    let (host, console) = StdHost::capture();
    let err = Interpreter::new(host)
        .read(r#"(set! foo (.log console "evaluated"))"#)
        .unwrap_err();
    assert!(matches!(err, EvalError::Name(_)));
    assert!(console.borrow().is_empty());
}

#[test]
fn test_unbound_symbol_is_undefined() {
    assert_eq!(read("(do nothing)").unwrap(), Value::Undefined);
}

#[test]
fn test_calling_a_non_function() {
    let err = read("(1 2)").unwrap_err();
    assert_eq!(err.to_string(), "1 is not a function");

    let err = read("(nothing 2)").unwrap_err();
    assert_eq!(err.to_string(), "undefined is not a function");
}

#[test]
fn test_arguments_evaluate_before_the_callee_is_checked() {
    let (host, console) = StdHost::capture();
    let err = Interpreter::new(host)
        .read(r#"(nothing (.log console "a") (.log console "b"))"#)
        .unwrap_err();
    assert!(matches!(err, EvalError::NotAFunction(_)));
    assert_eq!(
        *console.borrow(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn test_closure_application() {
    assert_eq!(read("((fun [x] (+ x 1)) 1)").unwrap(), num(2.0));
    assert_eq!(read("((fun [x] (def s x) (+ s 1)) 1)").unwrap(), num(2.0));
    assert_eq!(read("((fun [x y] (- x y)) 10 4)").unwrap(), num(6.0));
}

#[test]
fn test_closure_arity_is_not_checked() {
    // Missing arguments leave the parameter unbound.
    assert_eq!(read("((fun [x] x))").unwrap(), Value::Undefined);
    assert_eq!(read("((fun [x] (+ x 1)))").unwrap().to_string(), "NaN");
    // Surplus arguments are dropped.
    assert_eq!(read("((fun [x] x) 1 2 3)").unwrap(), num(1.0));
}

#[test]
fn test_closure_parameters_shadow_globals() {
    assert_eq!(
        read("(do (def x 1) ((fun [x] x) 5) x)").unwrap(),
        num(1.0)
    );
}

#[test]
fn test_closures_capture_their_defining_scope() {
    let source = r#"(do
        (def make-counter (fun [start]
            (def count start)
            (fun [] (set! count (+ count 1)))))
        (def counter (make-counter 10))
        (counter)
        (counter))"#;
    assert_eq!(read(source).unwrap(), num(12.0));
}

#[test]
fn test_closure_calls_get_fresh_frames() {
    let source = r#"(do
        (def f (fun [x] (def local x) local))
        (f 1)
        (f 2))"#;
    assert_eq!(read(source).unwrap(), num(2.0));
}

#[test]
fn test_def_overwrites_an_outer_binding() {
    // `def` shares `set` with `set!`: an existing binding anywhere in the
    // chain is overwritten in place.
    let source = r#"(do
        (def x 1)
        ((fun [] (def x 2)))
        x)"#;
    assert_eq!(read(source).unwrap(), num(2.0));
}

#[test]
fn test_recursion() {
    let source = r#"(do
        (def sum (fun [n] (if (< n 1) 0 (+ n (sum (- n 1))))))
        (sum 10))"#;
    assert_eq!(read(source).unwrap(), num(55.0));
}

#[test]
fn test_do_uses_the_same_scope() {
    let interpreter = Interpreter::default();
    let env = interpreter.global_env();
    interpreter
        .run(&parse("(do (def a 1) (def b 2))").unwrap(), &env)
        .unwrap();
    assert_eq!(env.get("a"), Some(num(1.0)));
    assert_eq!(env.get("b"), Some(num(2.0)));
}

#[test]
fn test_empty_bodies_fail() {
    let err = read("((fun [x]) 1)").unwrap_err();
    assert!(matches!(
        err,
        EvalError::Form(FormError::EmptyBody(SpecialForm::Fun))
    ));
    let err = read("(do)").unwrap_err();
    assert!(matches!(
        err,
        EvalError::Form(FormError::EmptyBody(SpecialForm::Do))
    ));
}

#[test]
fn test_empty_list_fails() {
    assert!(matches!(
        read("(do ())").unwrap_err(),
        EvalError::Form(FormError::EmptyList)
    ));
}

#[test]
fn test_method_call() {
    let (host, console) = StdHost::capture();
    let interpreter = Interpreter::new(host);
    let value = interpreter.read(r#"(.log console "foo" 1)"#).unwrap();
    assert_eq!(value, Value::Undefined);
    assert_eq!(*console.borrow(), vec!["foo 1".to_string()]);
}

#[test]
fn test_method_call_unknown_member() {
    let err = read(r#"(.warn console "foo")"#).unwrap_err();
    assert_eq!(err.to_string(), "[object console] has no member warn");
}

#[test]
fn test_require() {
    let http = Object::new("http").with_member(
        "status",
        Value::native("status", |_| Ok(Value::Number(200.0))),
    );
    let http = Value::Object(Rc::new(http));
    let interpreter = Interpreter::new(StdHost::new().with_module("http", http.clone()));

    assert_eq!(interpreter.read(r#"(require "http")"#).unwrap(), http);
    assert_eq!(
        interpreter
            .read(r#"(do (def http (require "http")) (.status http))"#)
            .unwrap(),
        num(200.0)
    );
    assert!(matches!(
        interpreter.read(r#"(require "fs")"#),
        Err(EvalError::Host(_))
    ));
}

#[test]
fn test_explicit_environment_persists_across_runs() {
    let interpreter = Interpreter::default();
    let env = interpreter.global_env();
    interpreter
        .run(&parse("(def greeting \"hi\")").unwrap(), &env)
        .unwrap();
    let value = interpreter
        .run(&parse("(+ greeting \" there\")").unwrap(), &env)
        .unwrap();
    assert_eq!(value, Value::str("hi there"));

    // A fresh environment does not see it.
    assert_eq!(interpreter.read("(do greeting)").unwrap(), Value::Undefined);
}

#[test]
fn test_global_env_is_seeded() {
    let interpreter = Interpreter::default();
    let env = interpreter.global_env();
    for name in ["+", "-", "<", ">", "require", "console", "true", "undefined"] {
        assert!(env.has(name), "{name} should be bound");
    }
}

#[test]
fn test_read_all() {
    let interpreter = Interpreter::default();
    let value = interpreter
        .read_all("(def x 2)\n(def y 3)\n(+ x y)")
        .unwrap();
    assert_eq!(value, num(5.0));
    assert_eq!(interpreter.read_all("").unwrap(), Value::Undefined);
}

#[test]
fn test_read_errors_propagate() {
    assert!(matches!(read("(+ 1 2"), Err(EvalError::Read(_))));
}

#[test]
fn test_to_json() {
    let value = read("(quote (a b))").unwrap();
    assert_eq!(value.to_json(), serde_json::json!(["a", "b"]));
    assert_eq!(read("(+ 1 2)").unwrap().to_json(), serde_json::json!(3.0));
    assert_eq!(read("(do nothing)").unwrap().to_json(), serde_json::Value::Null);
}
