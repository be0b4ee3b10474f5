//! Syntax tree types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::form::{Form, FormError};

/// An identifier.
///
/// Serialises as `{"name": "..."}` so that symbols stay distinguishable from
/// string atoms in JSON dumps of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method name of a dot-call head (`.log` -> `log`).
    pub fn method_name(&self) -> Option<&str> {
        self.name.strip_prefix('.')
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An indivisible lexical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    /// Text between double quotes, taken verbatim.
    String(String),
    Number(f64),
    Symbol(Symbol),
}

/// A node of the syntax tree: an atom or a list of nodes.
///
/// Trees are immutable once read; both the evaluator and the code
/// generators borrow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    Atom(Atom),
    List(Vec<Expr>),
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Atom(Atom::Symbol(Symbol::new(name)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Atom(Atom::String(value.into()))
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Expr::Atom(Atom::Number(value.into()))
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }

    /// Returns the symbol if this node is a symbol atom.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Atom(Atom::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns the items if this node is a list.
    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Expr::List(_))
    }

    /// Classify this node for evaluation or emission.
    pub fn form(&self) -> Result<Form<'_>, FormError> {
        Form::classify(self)
    }

    /// Plain text of this node, as produced by `quote`.
    ///
    /// Strings yield their contents, numbers their shortest decimal form,
    /// symbols their name, and lists their items' text joined with `,`.
    pub fn to_text(&self) -> String {
        match self {
            Expr::Atom(Atom::String(s)) => s.clone(),
            Expr::Atom(Atom::Number(n)) => format_number(*n),
            Expr::Atom(Atom::Symbol(sym)) => sym.name.clone(),
            Expr::List(items) => items
                .iter()
                .map(Expr::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Renders the node back in surface syntax.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atom(Atom::String(s)) => write!(f, "\"{}\"", s),
            Expr::Atom(Atom::Number(n)) => f.write_str(&format_number(*n)),
            Expr::Atom(Atom::Symbol(sym)) => write!(f, "{}", sym),
            Expr::List(items) => {
                f.write_str("(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Expr::Atom(Atom::Symbol(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::string(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::number(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::number(value)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(value: Vec<Expr>) -> Self {
        Expr::List(value)
    }
}

/// Format a number the way the target language prints it.
///
/// Integral values drop the fractional part (`3`, not `3.0`), and the
/// non-finite values are spelled `NaN`, `Infinity` and `-Infinity`.
/// Decimal exponents below -6 or above 20 switch to exponent notation
/// (`1e-7`, `1e+21`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else {
        // `{:e}` gives the shortest round-tripping digits, like `{}`.
        let sci = format!("{:e}", n);
        match sci.split_once('e') {
            Some((mantissa, exp)) => match exp.parse::<i32>() {
                Ok(exp) if !(-7 < exp && exp < 21) => {
                    let sign = if exp < 0 { "" } else { "+" };
                    format!("{}e{}{}", mantissa, sign, exp)
                }
                _ => format!("{}", n),
            },
            None => format!("{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.14), "3.14");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_number_exponent_thresholds() {
        assert_eq!(format_number(1e-6), "0.000001");
        assert_eq!(format_number(1.5e-6), "0.0000015");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e21), "1.5e+21");
        assert_eq!(format_number(-1e300), "-1e+300");
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Expr::string("a string").to_text(), "a string");
        assert_eq!(Expr::symbol("foo").to_text(), "foo");
        assert_eq!(Expr::number(5).to_text(), "5");
        let nested = Expr::list(vec![
            Expr::symbol("a"),
            Expr::list(vec![Expr::symbol("b"), Expr::number(1)]),
        ]);
        assert_eq!(nested.to_text(), "a,b,1");
    }

    #[test]
    fn test_display_round_trips_surface_syntax() {
        let expr = Expr::list(vec![
            Expr::symbol("+"),
            Expr::string("a"),
            Expr::list(vec![Expr::symbol("f"), Expr::number(2.5)]),
        ]);
        assert_eq!(expr.to_string(), "(+ \"a\" (f 2.5))");
    }
}
