//! Ledger cell values.

use std::fmt;

/// One cell of a ledger or auxiliary table.
///
/// Numbers print with Rust's shortest round-trip formatting, so a written
/// ledger reloads to the same values.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Read a cell back from its text form: empty, a number, or text.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Cell::Number(v),
                _ => Cell::Text(s.to_owned()),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Non-finite numbers have no cell representation and become empty.
impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        if v.is_finite() { Cell::Number(v) } else { Cell::Empty }
    }
}

impl From<u64> for Cell {
    fn from(v: u64) -> Self {
        Cell::Number(v as f64)
    }
}

impl From<usize> for Cell {
    fn from(v: usize) -> Self {
        Cell::Number(v as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Empty, Into::into)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() { Cell::Empty } else { Cell::Text(s) }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from(s.to_owned())
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Text(if b { "true" } else { "false" }.to_owned())
    }
}

/// Storage type of a column in the typed backends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only numbers and empty cells.
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn infer<'c>(cells: impl IntoIterator<Item = &'c Cell>) -> Self {
        if cells.into_iter().any(|c| matches!(c, Cell::Text(_))) {
            ColumnKind::Text
        } else {
            ColumnKind::Numeric
        }
    }
}
