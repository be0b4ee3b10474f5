//! Form classification.
//!
//! A list is classified once by its head: a special form, a dot-call
//! (`(.method receiver args...)`), or a plain call. The evaluator and the
//! code generators both match on [`Form`] instead of re-testing symbol text,
//! and both see the same structural errors.

use std::fmt;
use thiserror::Error;

use crate::expr::{Atom, Expr, Symbol};

/// Errors in the shape of a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("empty list has no head to apply")]
    EmptyList,

    #[error("{form} is missing operand {position}")]
    MissingOperand { form: SpecialForm, position: usize },

    #[error("{form} expects a symbol at position {position}, got {got}")]
    ExpectedSymbol {
        form: SpecialForm,
        position: usize,
        got: String,
    },

    #[error("fun expects a parameter list, got {0}")]
    ExpectedParams(String),

    #[error("{0} needs at least one body expression")]
    EmptyBody(SpecialForm),

    #[error("method call .{method} is missing its receiver")]
    MissingReceiver { method: String },
}

/// Head symbols with their own evaluation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    Quote,
    If,
    Def,
    Fun,
    Set,
    Do,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 6] = [
        SpecialForm::Quote,
        SpecialForm::If,
        SpecialForm::Def,
        SpecialForm::Fun,
        SpecialForm::Set,
        SpecialForm::Do,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quote" => Some(SpecialForm::Quote),
            "if" => Some(SpecialForm::If),
            "def" => Some(SpecialForm::Def),
            "fun" => Some(SpecialForm::Fun),
            "set!" => Some(SpecialForm::Set),
            "do" => Some(SpecialForm::Do),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::If => "if",
            SpecialForm::Def => "def",
            SpecialForm::Fun => "fun",
            SpecialForm::Set => "set!",
            SpecialForm::Do => "do",
        }
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Form<'a> {
    /// Strings and numbers evaluate to themselves; symbols are variable references.
    Atom(&'a Atom),
    /// `(quote x)`
    Quote(&'a Expr),
    /// `(if test then else?)`; a missing else branch yields undefined.
    If {
        test: &'a Expr,
        then: &'a Expr,
        otherwise: Option<&'a Expr>,
    },
    /// `(def name value)`
    Def { name: &'a Symbol, value: &'a Expr },
    /// `(set! name value)`
    Set { name: &'a Symbol, value: &'a Expr },
    /// `(fun [params...] body...)`
    Fun {
        params: Vec<&'a Symbol>,
        body: &'a [Expr],
    },
    /// `(do body...)`
    Do(&'a [Expr]),
    /// `(.method receiver args...)`
    MethodCall {
        method: &'a str,
        receiver: &'a Expr,
        args: &'a [Expr],
    },
    /// `(callee args...)`
    Call { callee: &'a Expr, args: &'a [Expr] },
}

impl<'a> Form<'a> {
    /// Classify a syntax node.
    pub fn classify(expr: &'a Expr) -> Result<Self, FormError> {
        let items = match expr {
            Expr::Atom(atom) => return Ok(Form::Atom(atom)),
            Expr::List(items) => items,
        };
        let (head, operands) = items.split_first().ok_or(FormError::EmptyList)?;

        let Some(sym) = head.as_symbol() else {
            return Ok(Form::Call {
                callee: head,
                args: operands,
            });
        };

        if let Some(kind) = SpecialForm::from_name(sym.name()) {
            return classify_special(kind, operands);
        }

        if let Some(method) = sym.method_name() {
            let (receiver, args) =
                operands
                    .split_first()
                    .ok_or_else(|| FormError::MissingReceiver {
                        method: method.to_string(),
                    })?;
            return Ok(Form::MethodCall {
                method,
                receiver,
                args,
            });
        }

        Ok(Form::Call {
            callee: head,
            args: operands,
        })
    }

    /// The special form this node dispatches to, if any.
    pub fn special(&self) -> Option<SpecialForm> {
        match self {
            Form::Quote(_) => Some(SpecialForm::Quote),
            Form::If { .. } => Some(SpecialForm::If),
            Form::Def { .. } => Some(SpecialForm::Def),
            Form::Fun { .. } => Some(SpecialForm::Fun),
            Form::Set { .. } => Some(SpecialForm::Set),
            Form::Do(_) => Some(SpecialForm::Do),
            Form::Atom(_) | Form::MethodCall { .. } | Form::Call { .. } => None,
        }
    }
}

fn operand(kind: SpecialForm, operands: &[Expr], position: usize) -> Result<&Expr, FormError> {
    operands.get(position - 1).ok_or(FormError::MissingOperand {
        form: kind,
        position,
    })
}

fn name_operand(kind: SpecialForm, operands: &[Expr]) -> Result<&Symbol, FormError> {
    let expr = operand(kind, operands, 1)?;
    expr.as_symbol().ok_or_else(|| FormError::ExpectedSymbol {
        form: kind,
        position: 1,
        got: expr.to_string(),
    })
}

fn classify_special(kind: SpecialForm, operands: &[Expr]) -> Result<Form<'_>, FormError> {
    match kind {
        SpecialForm::Quote => Ok(Form::Quote(operand(kind, operands, 1)?)),

        SpecialForm::If => Ok(Form::If {
            test: operand(kind, operands, 1)?,
            then: operand(kind, operands, 2)?,
            otherwise: operands.get(2),
        }),

        SpecialForm::Def => Ok(Form::Def {
            name: name_operand(kind, operands)?,
            value: operand(kind, operands, 2)?,
        }),

        SpecialForm::Set => Ok(Form::Set {
            name: name_operand(kind, operands)?,
            value: operand(kind, operands, 2)?,
        }),

        SpecialForm::Fun => {
            let params_expr = operand(kind, operands, 1)?;
            let params = params_expr
                .as_list()
                .ok_or_else(|| FormError::ExpectedParams(params_expr.to_string()))?
                .iter()
                .map(|p| {
                    p.as_symbol().ok_or_else(|| FormError::ExpectedSymbol {
                        form: kind,
                        position: 1,
                        got: p.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let body = &operands[1..];
            if body.is_empty() {
                return Err(FormError::EmptyBody(kind));
            }
            Ok(Form::Fun { params, body })
        }

        SpecialForm::Do => {
            if operands.is_empty() {
                return Err(FormError::EmptyBody(kind));
            }
            Ok(Form::Do(operands))
        }
    }
}
