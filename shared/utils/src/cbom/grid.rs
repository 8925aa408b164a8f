//! Untyped spreadsheet grid
//!
//! The CBOM core only ever addresses cells by absolute, 0-indexed
//! `(row, col)`. Anything that can answer that question implements
//! [`CellGrid`]; [`Grid`] is the row-major implementation produced by the
//! loader.

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

static MISSING: CellValue = CellValue::Missing;

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Textual form of the cell, `None` for missing cells.
    ///
    /// Integral numbers render without a fractional part so that a 12NC
    /// stored as a number reads the same as one stored as text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Missing => None,
        }
    }

    /// Trimmed text, or an empty string for missing cells
    pub fn trimmed_text(&self) -> String {
        self.as_text()
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Whether the cell carries no quantity: missing, or numerically zero.
    ///
    /// Any other text, blank or not, counts as present and is coerced later.
    pub fn is_empty_quantity(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(n) => *n == 0.0,
            Self::Text(s) => s.trim().parse::<f64>().map(|v| v == 0.0).unwrap_or(false),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

fn format_number(n: f64) -> String {
    // f64 holds every integer up to 2^53 exactly
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Read-only, 0-indexed view over spreadsheet cells.
pub trait CellGrid {
    /// Number of rows
    fn height(&self) -> usize;

    /// Number of columns (the widest row)
    fn width(&self) -> usize;

    /// Cell at `(row, col)`; out-of-range addresses read as missing.
    fn cell(&self, row: usize, col: usize) -> &CellValue;
}

/// Row-major grid; rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    /// An all-missing grid of the given size
    pub fn empty(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![CellValue::Missing; width]; height],
            width,
        }
    }

    /// Overwrite one cell, growing the grid as needed
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize(col + 1, CellValue::Missing);
        }
        cells[col] = value;
        self.width = self.width.max(col + 1);
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl CellGrid for Grid {
    fn height(&self) -> usize {
        self.rows.len()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&MISSING)
    }
}
