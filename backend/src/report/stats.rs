//! Descriptive statistics for numeric columns.

use serde::Serialize;

use crate::table::{Cell, Table};

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Statistics of `values`, or `None` when empty.
    pub fn from_values(column: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        });

        Some(Self {
            column: column.into(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Statistics for every numeric column of `table`.
///
/// A column is numeric when it has at least one value and every non-missing
/// cell reads as a number.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    table
        .headers()
        .iter()
        .filter_map(|name| {
            let cells = table.column(name);
            let present: Vec<&Cell> = cells.into_iter().filter(|c| !c.is_missing()).collect();
            let values: Option<Vec<f64>> = present.iter().map(|c| c.to_number()).collect();
            ColumnStats::from_values(name.as_str(), &values?)
        })
        .collect()
}

/// Statistics of `columns` over the rows where all of them are numeric.
///
/// Columns absent from the table are left out.
pub fn describe_complete_rows(table: &Table, columns: &[&str]) -> Vec<ColumnStats> {
    let present: Vec<&str> = columns.iter().copied().filter(|c| table.has_column(c)).collect();
    let numeric: Vec<Vec<Option<f64>>> = present.iter().map(|c| table.numeric_column(c)).collect();

    let complete: Vec<usize> = (0..table.row_count())
        .filter(|&row| numeric.iter().all(|col| col[row].is_some()))
        .collect();

    present
        .iter()
        .zip(&numeric)
        .filter_map(|(name, col)| {
            let values: Vec<f64> = complete.iter().filter_map(|&row| col[row]).collect();
            ColumnStats::from_values(*name, &values)
        })
        .collect()
}
