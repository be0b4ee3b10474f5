//! The tree-walking evaluator.

use rhizome_bramble_ir::{Atom, Expr, Form, parse, parse_all};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::EvalError;
use crate::env::Env;
use crate::host::{Host, StdHost};
use crate::natives::native_primitives;
use crate::value::{Closure, Function, Value};

/// Evaluates syntax trees against a host.
///
/// The interpreter holds no scope of its own: callers own the global
/// [`Env`] (see [`Interpreter::global_env`]) and may reuse it across runs.
pub struct Interpreter {
    host: Rc<dyn Host>,
}

impl Interpreter {
    pub fn new(host: impl Host + 'static) -> Self {
        Interpreter {
            host: Rc::new(host),
        }
    }

    /// Build a global frame seeded with the native primitives, the host's
    /// globals and `require`.
    pub fn global_env(&self) -> Env {
        debug!("creating global environment");
        let env = Env::new();
        env.load(native_primitives()).load(self.host.globals());

        let host = self.host.clone();
        env.define(
            "require",
            Value::native("require", move |args| {
                let name = args.first().cloned().unwrap_or(Value::Undefined);
                host.require(&name.to_string())
            }),
        );
        env
    }

    /// Evaluate `expr` in `env`.
    pub fn run(&self, expr: &Expr, env: &Env) -> Result<Value, EvalError> {
        match expr.form()? {
            Form::Atom(Atom::Symbol(sym)) => Ok(env.get(sym.name()).unwrap_or(Value::Undefined)),
            Form::Atom(Atom::String(s)) => Ok(Value::Str(s.clone())),
            Form::Atom(Atom::Number(n)) => Ok(Value::Number(*n)),

            Form::Quote(quoted) => {
                trace!("quote");
                Ok(match quoted {
                    Expr::List(items) => {
                        Value::List(items.iter().map(|item| Value::Str(item.to_text())).collect())
                    }
                    atom => Value::Str(atom.to_text()),
                })
            }

            Form::If {
                test,
                then,
                otherwise,
            } => {
                trace!("if");
                if self.run(test, env)?.is_truthy() {
                    self.run(then, env)
                } else if let Some(otherwise) = otherwise {
                    self.run(otherwise, env)
                } else {
                    Ok(Value::Undefined)
                }
            }

            Form::Def { name, value } => {
                trace!(name = name.name(), "def");
                let value = self.run(value, env)?;
                env.set(name.name(), value);
                Ok(Value::Undefined)
            }

            Form::Set { name, value } => {
                trace!(name = name.name(), "set!");
                if !env.has(name.name()) {
                    return Err(EvalError::Name(name.to_string()));
                }
                let value = self.run(value, env)?;
                env.set(name.name(), value.clone());
                Ok(value)
            }

            Form::Fun { params, body } => {
                trace!(params = params.len(), "fun");
                Ok(Value::Function(Function::Closure(Rc::new(Closure {
                    params: params.iter().map(|p| p.name.clone()).collect(),
                    body: body.to_vec(),
                    env: env.clone(),
                }))))
            }

            Form::Do(body) => {
                trace!("do");
                self.run_body(body, env)
            }

            Form::MethodCall {
                method,
                receiver,
                args,
            } => {
                let receiver = self.run(receiver, env)?;
                let callee = self.host.resolve_member(&receiver, method)?;
                let args = self.run_all(args, env)?;
                self.apply(&callee, &args)
            }

            Form::Call { callee, args } => {
                let callee = self.run(callee, env)?;
                let args = self.run_all(args, env)?;
                self.apply(&callee, &args)
            }
        }
    }

    /// Evaluate `expr` in a fresh global environment.
    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        self.run(expr, &self.global_env())
    }

    /// Read the first form of `source` and evaluate it in a fresh global
    /// environment.
    pub fn read(&self, source: &str) -> Result<Value, EvalError> {
        self.eval(&parse(source)?)
    }

    /// Read every form of `source` and evaluate them in order in one fresh
    /// global environment, returning the last value.
    pub fn read_all(&self, source: &str) -> Result<Value, EvalError> {
        let forms = parse_all(source)?;
        let env = self.global_env();
        self.run_body(&forms, &env)
    }

    /// Apply a callable to already-evaluated arguments.
    ///
    /// A closure binds each parameter to the argument at the same position
    /// in a child of its captured frame. Surplus arguments are dropped and
    /// parameters without an argument stay unbound.
    pub fn apply(&self, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match callee {
            Value::Function(Function::Native(native)) => {
                trace!(native = native.name(), args = args.len(), "apply");
                native.call(args)
            }
            Value::Function(Function::Closure(closure)) => {
                trace!(args = args.len(), "apply closure");
                let frame = closure.env.child();
                for (param, arg) in closure.params.iter().zip(args) {
                    frame.define(param, arg.clone());
                }
                self.run_body(&closure.body, &frame)
            }
            other => Err(EvalError::NotAFunction(other.to_string())),
        }
    }

    fn run_body(&self, body: &[Expr], env: &Env) -> Result<Value, EvalError> {
        let mut result = Value::Undefined;
        for expr in body {
            result = self.run(expr, env)?;
        }
        Ok(result)
    }

    /// Evaluate left to right.
    fn run_all(&self, exprs: &[Expr], env: &Env) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|expr| self.run(expr, env)).collect()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(StdHost::new())
    }
}
