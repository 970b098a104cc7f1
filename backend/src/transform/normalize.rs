//! Column Normalizer.
//!
//! Drops the source columns the report never reads, renames the rest to the
//! canonical schema and fills unknown gender/region with [`UNKNOWN`].

use crate::schema::{canonical_name, DROPPED_COLUMNS, GENDER, REGION, UNKNOWN};
use crate::table::{Cell, Table};

/// Normalize columns of a raw table.
///
/// Listed columns that are absent are skipped. Running this on an already
/// normalized table returns it unchanged.
pub fn normalize_columns(table: Table) -> Table {
    table
        .without_columns(DROPPED_COLUMNS)
        .with_renamed_columns(canonical_name)
        .map_column(REGION, fill_unknown)
        .map_column(GENDER, fill_unknown)
}

fn fill_unknown(cell: Cell) -> Cell {
    if cell.is_empty() {
        Cell::Text(UNKNOWN.to_string())
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn raw() -> Table {
        parse_str(
            "Season Number,Startup Name,Pitchers Gender,Pitchers State,Episode Number,Loan,Custom\n\
             1,AvaTheElephant,Female,,1,,keep\n\
             2,Scrub Daddy,,PA,7,,keep\n",
            ',',
        )
        .unwrap()
    }

    #[test]
    fn test_drops_and_renames() {
        let table = normalize_columns(raw());
        assert_eq!(
            table.headers(),
            &[
                "Staffelnummer".to_string(),
                "Name des Startups".to_string(),
                "Pitcher Geschlecht".to_string(),
                "Pitcher Bundesstaat".to_string(),
                "Custom".to_string(),
            ]
        );
    }

    #[test]
    fn test_fills_unknown() {
        let table = normalize_columns(raw());
        assert_eq!(table.cell(0, REGION), Some(&Cell::Text("Unbekannt".into())));
        assert_eq!(table.cell(1, GENDER), Some(&Cell::Text("Unbekannt".into())));
        assert_eq!(table.cell(1, REGION), Some(&Cell::Text("PA".into())));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_columns(raw());
        let twice = normalize_columns(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_gender_and_region_columns_tolerated() {
        let table = parse_str("Industry\nFood", ',').unwrap();
        let table = normalize_columns(table);
        assert_eq!(table.headers(), &["Branche".to_string()]);
    }
}
