//! Syntax tree to JavaScript.
//!
//! Every emitter takes the indentation of the line its output starts on.
//! Continuation lines of multi-line output (function bodies, ternary
//! branches) are indented relative to it; the first line never is.

mod infix;
mod special;

use rhizome_bramble_ir::{Atom, Expr, Form, FormError, format_number, is_native_operator};
use std::collections::HashSet;
use thiserror::Error;
use tracing::trace;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("malformed form: {0}")]
    Form(#[from] FormError),

    #[error("def of {name} can only appear as a statement")]
    DefInExpression { name: String },
}

/// Whether emitted code stands alone as a statement or is nested inside
/// another expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Statement,
    Expression,
}

/// JavaScript reserved words that need escaping.
///
/// `true`, `false` and `null` are left out: the evaluator binds them as
/// globals, so they pass through as the literals they name.
fn js_keywords() -> HashSet<&'static str> {
    [
        "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "finally", "for", "function", "if",
        "implements", "import", "in", "instanceof", "interface", "let", "new", "package",
        "private", "protected", "public", "return", "static", "super", "switch", "this",
        "throw", "try", "typeof", "var", "void", "while", "with", "yield",
    ]
    .into_iter()
    .collect()
}

/// Convert a symbol name to a safe JavaScript identifier.
pub(crate) fn to_js_name(name: &str) -> String {
    // Replace invalid characters with _
    let mut safe: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Cannot start with digit
    if safe.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        safe = format!("_{}", safe);
    }

    if js_keywords().contains(safe.as_str()) {
        format!("_{}", safe)
    } else {
        safe
    }
}

/// Property names are looked up verbatim by the host, so they are never
/// sanitized: reserved words are fine after a dot, anything else that is
/// not an identifier goes in brackets.
fn member_access(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        format!(".{}", name)
    } else {
        format!("[{}]", js_string_literal(name))
    }
}

pub(crate) fn js_string_literal(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}

pub(crate) fn spaces(indent: usize) -> String {
    " ".repeat(indent)
}

/// Render `expr` as JavaScript.
pub fn codegen(expr: &Expr) -> Result<String, CodegenError> {
    emit(expr, 0, Position::Statement)
}

/// Render `expr` as JavaScript with every line indented by `indent` spaces.
pub fn codegen_indented(expr: &Expr, indent: usize) -> Result<String, CodegenError> {
    Ok(format!(
        "{}{}",
        spaces(indent),
        emit(expr, indent, Position::Statement)?
    ))
}

pub(crate) fn emit(
    expr: &Expr,
    indent: usize,
    position: Position,
) -> Result<String, CodegenError> {
    let form = expr.form()?;
    trace!(?position, special = ?form.special(), "emit");

    match form {
        Form::Atom(Atom::Symbol(sym)) => Ok(to_js_name(sym.name())),
        Form::Atom(Atom::String(s)) => Ok(js_string_literal(s)),
        Form::Atom(Atom::Number(n)) => Ok(format_number(*n)),

        Form::Quote(quoted) => Ok(special::quote(quoted)),
        Form::If {
            test,
            then,
            otherwise,
        } => special::conditional(test, then, otherwise, indent, position),
        // A declaration has no value, so it cannot be nested.
        Form::Def { name, .. } if position == Position::Expression => {
            Err(CodegenError::DefInExpression {
                name: name.name().to_string(),
            })
        }
        Form::Def { name, value } => Ok(format!(
            "var {} = {}",
            to_js_name(name.name()),
            emit(value, indent, Position::Expression)?
        )),
        Form::Set { name, value } => Ok(format!(
            "{} = {}",
            to_js_name(name.name()),
            emit(value, indent, Position::Expression)?
        )),
        Form::Fun { params, body } => special::function(&params, body, indent, position),
        Form::Do(body) => special::sequence(body, indent),

        Form::MethodCall {
            method,
            receiver,
            args,
        } => {
            // `1.toFixed()` would read as a malformed number.
            let receiver = match receiver {
                Expr::Atom(Atom::Number(_)) => {
                    format!("({})", emit(receiver, indent, Position::Expression)?)
                }
                _ => operand(receiver, indent)?,
            };
            Ok(format!(
                "{}{}({})",
                receiver,
                member_access(method),
                operands(args, indent)?.join(", ")
            ))
        }

        Form::Call { callee, args } => {
            if let Some(op) = callee
                .as_symbol()
                .filter(|sym| is_native_operator(sym.name()))
            {
                return infix::emit_infix(op.name(), args, indent);
            }
            Ok(format!(
                "{}({})",
                operand(callee, indent)?,
                operands(args, indent)?.join(", ")
            ))
        }
    }
}

/// Emit a nested expression, parenthesising list forms.
pub(crate) fn operand(expr: &Expr, indent: usize) -> Result<String, CodegenError> {
    let code = emit(expr, indent, Position::Expression)?;
    if expr.is_list() {
        Ok(format!("({})", code))
    } else {
        Ok(code)
    }
}

pub(crate) fn operands(exprs: &[Expr], indent: usize) -> Result<Vec<String>, CodegenError> {
    exprs.iter().map(|expr| operand(expr, indent)).collect()
}
