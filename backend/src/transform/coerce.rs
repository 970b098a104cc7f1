//! Numeric Coercion Stage.
//!
//! Turns the financial columns into numbers for aggregation. The
//! not-applicable marker and anything that is not a finite number become
//! true-missing, so a financial cell leaves this stage as either
//! [`Cell::Number`] or [`Cell::Missing`].

use crate::schema::financial_columns;
use crate::table::{parse_finite, Cell, Table};

/// Coerce every financial column to numbers.
pub fn coerce_financials(table: Table) -> Table {
    financial_columns()
        .iter()
        .fold(table, |table, column| coerce_column(table, column))
}

/// Coerce a single column. Absent columns are skipped.
pub fn coerce_column(table: Table, column: &str) -> Table {
    table.map_column(column, coerce_cell)
}

fn coerce_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Number(n) if n.is_finite() => Cell::Number(n),
        Cell::Text(ref s) => match parse_finite(s) {
            Some(n) => Cell::Number(n),
            None => Cell::Missing,
        },
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn financial_table(cells: Vec<Cell>) -> Table {
        Table::new(
            vec!["Lori Greiner Investitionssumme".into()],
            cells.into_iter().map(|c| vec![c]).collect(),
        )
    }

    #[test]
    fn test_marker_becomes_missing() {
        let table = coerce_financials(financial_table(vec![
            Cell::NotApplicable,
            Cell::Text("2500".into()),
            Cell::Text("0".into()),
        ]));
        let col = table.column("Lori Greiner Investitionssumme");
        assert_eq!(col[0], &Cell::Missing);
        assert_eq!(col[1], &Cell::Number(2500.0));
        assert_eq!(col[2], &Cell::Number(0.0));
    }

    #[test]
    fn test_unparseable_becomes_missing() {
        let table = coerce_financials(financial_table(vec![
            Cell::Text("lots".into()),
            Cell::Text("inf".into()),
            Cell::Number(f64::NAN),
        ]));
        assert!(table.rows().iter().all(|r| r[0].is_missing()));
    }

    #[test]
    fn test_never_leaves_marker() {
        let table = coerce_financials(financial_table(vec![
            Cell::NotApplicable,
            Cell::Text("N/A".into()),
            Cell::Text("12.5".into()),
            Cell::Missing,
        ]));
        for row in table.rows() {
            assert!(matches!(row[0], Cell::Number(n) if n.is_finite()) || row[0].is_missing());
        }
    }

    #[test]
    fn test_other_columns_untouched() {
        let table = Table::new(
            vec!["Branche".into()],
            vec![vec![Cell::Text("abc".into())]],
        );
        let coerced = coerce_financials(table.clone());
        assert_eq!(table, coerced);
    }
}
