//! In-memory table of pitch records.
//!
//! A [`Table`] is a header row plus rows of [`Cell`]s, every row as wide as the
//! header. Transformation stages take a table by value and hand back a new one,
//! so a stage's input can never be observed half-rewritten.

use std::borrow::Cow;

/// Tokens that load as a true-missing value, matching common spreadsheet exports.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Marker written for a financial cell whose investor did not take part.
pub const NOT_APPLICABLE: &str = "N/A";

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// True-missing value.
    Missing,
    /// "Investor did not participate", distinct from zero.
    NotApplicable,
    /// Finite number.
    Number(f64),
    /// Any other content.
    Text(String),
}

impl Cell {
    /// Interpret a raw field read from a file.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_TOKENS.contains(&trimmed) {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Missing, or text that is blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The value if this cell already holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric reading of the cell: numbers as-is, text parsed when it is a
    /// finite decimal number.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_finite(s),
            _ => None,
        }
    }

    /// Label for grouping and filtering. `None` when missing.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::NotApplicable => Some(NOT_APPLICABLE.to_string()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    /// Field text as written to a file.
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            Cell::Missing => Cow::Borrowed(""),
            Cell::NotApplicable => Cow::Borrowed(NOT_APPLICABLE),
            Cell::Number(n) => Cow::Owned(format_number(*n)),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

/// Parse a finite number. Infinity and NaN spellings are rejected.
pub fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Shortest decimal text that parses back to exactly `n`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// A rectangular table with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding short rows with missing cells and cutting long ones.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column, top to bottom. Empty when the column is absent.
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|row| &row[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// Numeric reading of one column; absent column yields all `None`.
    pub fn numeric_column(&self, name: &str) -> Vec<Option<f64>> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|row| row[idx].to_number()).collect(),
            None => vec![None; self.rows.len()],
        }
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Drop every listed column that exists; unknown names are ignored.
    pub fn without_columns(self, names: &[&str]) -> Self {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !names.contains(&h.as_str()))
            .collect();
        if keep.iter().all(|k| *k) {
            return self;
        }

        let headers = self
            .headers
            .into_iter()
            .zip(&keep)
            .filter_map(|(h, k)| k.then_some(h))
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&keep)
                    .filter_map(|(c, k)| k.then_some(c))
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    /// Rename headers through `rename`; `None` keeps the current name.
    pub fn with_renamed_columns<F>(mut self, rename: F) -> Self
    where
        F: Fn(&str) -> Option<&'static str>,
    {
        for header in &mut self.headers {
            if let Some(new_name) = rename(header) {
                *header = new_name.to_string();
            }
        }
        self
    }

    /// Rewrite every cell of a column. No-op when the column is absent.
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Self
    where
        F: FnMut(Cell) -> Cell,
    {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                let cell = std::mem::replace(&mut row[idx], Cell::Missing);
                row[idx] = f(cell);
            }
        }
        self
    }

    /// Rows for which `keep` returns true, same columns.
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Table, usize) -> bool,
    {
        let rows = (0..self.rows.len())
            .filter(|&i| keep(self, i))
            .map(|i| self.rows[i].clone())
            .collect();
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Distinct non-missing labels of a column in first-seen order.
    pub fn distinct_labels(&self, name: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for cell in self.column(name) {
            if let Some(label) = cell.label() {
                if !seen.contains(&label) {
                    seen.push(label);
                }
            }
        }
        seen
    }
}
