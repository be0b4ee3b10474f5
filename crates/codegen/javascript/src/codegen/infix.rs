//! Native operators as infix expressions.

use rhizome_bramble_ir::Expr;

use super::{CodegenError, operands};

pub(crate) fn emit_infix(op: &str, args: &[Expr], indent: usize) -> Result<String, CodegenError> {
    let operands = operands(args, indent)?;

    match op {
        "<" | ">" => Ok(comparison(op, &operands)),
        _ if operands.is_empty() => Ok("undefined".to_string()),
        _ => Ok(operands.join(&format!(" {} ", op))),
    }
}

/// Every operand is evaluated exactly once, left to right, before any
/// comparison runs. Chains go through an immediately invoked function so
/// that `&&` can neither repeat a middle operand nor skip a later one.
fn comparison(op: &str, operands: &[String]) -> String {
    match operands {
        [] => "true".to_string(),
        [only] => format!("({}, true)", only),
        [a, b] => format!("{} {} {}", a, op, b),
        _ => {
            let params: Vec<_> = (0..operands.len()).map(|i| format!("${}", i)).collect();
            let tests: Vec<_> = params
                .windows(2)
                .map(|pair| format!("{} {} {}", pair[0], op, pair[1]))
                .collect();
            format!(
                "(function({}){{ return {}; }})({})",
                params.join(", "),
                tests.join(" && "),
                operands.join(", ")
            )
        }
    }
}
