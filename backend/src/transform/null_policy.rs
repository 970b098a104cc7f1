//! Null Policy Enforcer.
//!
//! In the per-investor financial columns an empty cell means "this investor did
//! not take part", which is not the same as investing zero. This stage makes
//! that explicit with [`Cell::NotApplicable`] before any number is read.

use crate::schema::financial_columns;
use crate::table::{Cell, Table};

/// Mark missing or blank financial cells as not applicable.
///
/// Zeros and any other content are left untouched; absent columns are skipped.
pub fn mark_not_applicable(table: Table) -> Table {
    financial_columns()
        .iter()
        .fold(table, |table, column| table.map_column(column, mark_cell))
}

fn mark_cell(cell: Cell) -> Cell {
    if cell.is_empty() {
        Cell::NotApplicable
    } else {
        cell
    }
}
