//! Special forms.

use rhizome_bramble_ir::{Expr, Form, Symbol};

use super::{CodegenError, Position, emit, js_string_literal, spaces, to_js_name};

/// `quote` yields text, never structure: a string literal for an atom, an
/// array of string literals for a list.
pub(crate) fn quote(quoted: &Expr) -> String {
    match quoted {
        Expr::List(items) => {
            let elements: Vec<_> = items
                .iter()
                .map(|item| js_string_literal(&item.to_text()))
                .collect();
            format!("[{}]", elements.join(", "))
        }
        atom => js_string_literal(&atom.to_text()),
    }
}

/// `if` as a ternary spread over three lines.
pub(crate) fn conditional(
    test: &Expr,
    then: &Expr,
    otherwise: Option<&Expr>,
    indent: usize,
    position: Position,
) -> Result<String, CodegenError> {
    let test_code = emit(test, indent, Position::Expression)?;
    // These would bind looser than `?:`.
    let test_code = if matches!(
        test.form(),
        Ok(Form::If { .. } | Form::Fun { .. } | Form::Set { .. })
    ) {
        format!("({})", test_code)
    } else {
        test_code
    };

    let branch_indent = indent + 2;
    let then_code = emit(then, branch_indent, Position::Expression)?;
    let else_code = match otherwise {
        Some(otherwise) => emit(otherwise, branch_indent, Position::Expression)?,
        None => "undefined".to_string(),
    };
    let terminator = if position == Position::Statement { ";" } else { "" };

    Ok(format!(
        "{}\n{}? {}\n{}: {}{}",
        test_code,
        spaces(branch_indent),
        then_code,
        spaces(branch_indent),
        else_code,
        terminator
    ))
}

/// `fun` as an anonymous function literal.
pub(crate) fn function(
    params: &[&Symbol],
    body: &[Expr],
    indent: usize,
    position: Position,
) -> Result<String, CodegenError> {
    let params: Vec<_> = params.iter().map(|p| to_js_name(p.name())).collect();
    let code = format!(
        "function({}){{\n{}\n{}}}",
        params.join(", "),
        body_lines(body, indent)?,
        spaces(indent)
    );
    // A statement starting with `function` would be a declaration.
    if position == Position::Statement {
        Ok(format!("({})", code))
    } else {
        Ok(code)
    }
}

/// `do` as an immediately invoked function.
pub(crate) fn sequence(body: &[Expr], indent: usize) -> Result<String, CodegenError> {
    Ok(format!(
        "(function(){{\n{}\n{}}})()",
        body_lines(body, indent)?,
        spaces(indent)
    ))
}

/// Body of a `fun` or `do`: one statement per line, the last one returned.
fn body_lines(body: &[Expr], indent: usize) -> Result<String, CodegenError> {
    let inner = indent + 2;
    let mut lines = Vec::with_capacity(body.len() + 1);

    for (idx, stmt) in body.iter().enumerate() {
        let is_last = idx + 1 == body.len();
        let form = stmt.form()?;
        let mut code = emit(stmt, inner, Position::Statement)?;
        // `if` terminates itself in statement position.
        if !matches!(form, Form::If { .. }) {
            code.push(';');
        }

        if !is_last {
            lines.push(format!("{}{}", spaces(inner), code));
        } else if matches!(form, Form::Def { .. }) {
            // `def` evaluates to undefined and cannot follow `return`.
            lines.push(format!("{}{}", spaces(inner), code));
            lines.push(format!("{}return undefined;", spaces(inner)));
        } else {
            lines.push(format!("{}return {}", spaces(inner), code));
        }
    }

    Ok(lines.join("\n"))
}
