//! S-expression reader.
//!
//! Lexing and parsing are combined: the reader matches tokens directly
//! against the remaining input, left to right, without backtracking.

use thiserror::Error;
use tracing::trace;

use crate::expr::{Atom, Expr, Symbol};

/// How much of the remaining input an error quotes.
const NEAR_CHARS: usize = 10;

/// Errors that can occur while reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("expected ) or ] near {near}")]
    Unclosed { near: String, offset: usize },

    #[error("expected ( or [ near {near}")]
    ExpectedList { near: String, offset: usize },
}

/// Read the first top-level list form of `source`.
///
/// Leading whitespace is skipped. Anything after the first form is ignored.
pub fn parse(source: &str) -> Result<Expr, ReadError> {
    let mut reader = Reader::new(source);
    reader.whitespace();
    match reader.list()? {
        Some(expr) => Ok(expr),
        None => Err(reader.expected_list()),
    }
}

/// Read every top-level list form of `source`.
pub fn parse_all(source: &str) -> Result<Vec<Expr>, ReadError> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();
    loop {
        reader.whitespace();
        if reader.rest().is_empty() {
            return Ok(forms);
        }
        match reader.list()? {
            Some(expr) => forms.push(expr),
            None => return Err(reader.expected_list()),
        }
    }
}

struct Reader<'a> {
    source: &'a str,
    pos: usize,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']')
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Reader { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn near(&self) -> String {
        self.rest().chars().take(NEAR_CHARS).collect()
    }

    fn expected_list(&self) -> ReadError {
        ReadError::ExpectedList {
            near: self.near(),
            offset: self.pos,
        }
    }

    fn whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn list(&mut self) -> Result<Option<Expr>, ReadError> {
        if !self.lparen() {
            return Ok(None);
        }
        let mut items = Vec::new();
        loop {
            if let Some(atom) = self.atom() {
                items.push(Expr::Atom(atom));
            } else if let Some(list) = self.list()? {
                items.push(list);
            } else {
                break;
            }
            self.whitespace();
        }
        if !self.rparen() {
            return Err(ReadError::Unclosed {
                near: self.near(),
                offset: self.pos,
            });
        }
        Ok(Some(Expr::List(items)))
    }

    fn lparen(&mut self) -> bool {
        match self.rest().chars().next() {
            Some(c @ ('(' | '[')) => {
                trace!("lparen {}", c);
                self.pos += 1;
                self.whitespace();
                true
            }
            _ => false,
        }
    }

    fn rparen(&mut self) -> bool {
        match self.rest().chars().next() {
            Some(c @ (')' | ']')) => {
                trace!("rparen {}", c);
                self.pos += 1;
                self.whitespace();
                true
            }
            _ => false,
        }
    }

    /// String, then number, then symbol: numeric literals never read as symbols.
    fn atom(&mut self) -> Option<Atom> {
        if let Some(s) = self.string() {
            return Some(Atom::String(s));
        }
        if let Some(n) = self.number() {
            return Some(Atom::Number(n));
        }
        self.symbol().map(Atom::Symbol)
    }

    fn string(&mut self) -> Option<String> {
        let rest = self.rest();
        let body = rest.strip_prefix('"')?;
        let end = body.find('"')?;
        if end == 0 {
            return None;
        }
        let value = body[..end].to_string();
        trace!("string \"{}\"", value);
        self.pos += end + 2;
        self.whitespace();
        Some(value)
    }

    fn number(&mut self) -> Option<f64> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let digits = |from: usize| {
            bytes[from..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };

        let int_len = digits(0);
        let mut len = int_len;
        if bytes.get(int_len) == Some(&b'.') {
            let frac_len = digits(int_len + 1);
            if frac_len > 0 {
                len = int_len + 1 + frac_len;
            }
        }
        if len == 0 {
            return None;
        }

        let value = rest[..len].parse::<f64>().ok()?;
        trace!("number {}", &rest[..len]);
        self.pos += len;
        Some(value)
    }

    fn symbol(&mut self) -> Option<Symbol> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || is_delimiter(c))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        trace!("symbol {}", &rest[..len]);
        self.pos += len;
        Some(Symbol::new(&rest[..len]))
    }
}
