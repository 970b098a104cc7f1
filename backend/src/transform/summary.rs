//! Investor Summary Aggregator.

use std::collections::BTreeMap;

use crate::models::{Investor, InvestorSummary, InvestorTotals};
use crate::table::{Cell, Table};

/// Total investment and equity per investor, guests included.
///
/// Cells that read as numbers contribute, whether coerced or still text. A
/// missing or unparseable entry adds nothing and an all-missing column sums
/// to 0.
pub fn summarize_investors(table: &Table) -> InvestorSummary {
    let totals: BTreeMap<Investor, InvestorTotals> = Investor::ALL
        .iter()
        .map(|&investor| {
            let totals = InvestorTotals {
                total_investment: column_sum(table, &investor.amount_column()),
                total_equity: column_sum(table, &investor.equity_column()),
            };
            (investor, totals)
        })
        .collect();

    InvestorSummary::new(totals)
}

fn column_sum(table: &Table, column: &str) -> f64 {
    table
        .column(column)
        .into_iter()
        .filter_map(Cell::to_number)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::transform::coerce::coerce_financials;
    use crate::transform::null_policy::mark_not_applicable;

    fn prepared(csv: &str) -> Table {
        coerce_financials(mark_not_applicable(parse_str(csv, ',').unwrap()))
    }

    #[test]
    fn test_missing_entries_skipped() {
        let table = prepared(
            "Mark Cuban Investitionssumme,Mark Cuban Kapitalbeteiligung\n\
             1000,10\n\
             ,\n\
             2000,5.5\n",
        );
        let summary = summarize_investors(&table);
        let cuban = summary.get(Investor::MarkCuban);
        assert_eq!(cuban.total_investment, 3000.0);
        assert_eq!(cuban.total_equity, 15.5);
    }

    #[test]
    fn test_all_seven_keys_present() {
        let table = prepared("Branche\nFood\n");
        let summary = summarize_investors(&table);
        assert_eq!(summary.len(), 7);
        for (_, totals) in summary.iter() {
            assert_eq!(totals, InvestorTotals::default());
        }
    }

    #[test]
    fn test_guest_bucket() {
        let table = prepared(
            "Gast Investitionssumme,Gast Kapitalbeteiligung\n\
             400000,20\n\
             100000,\n",
        );
        let guests = summarize_investors(&table).get(Investor::Guest);
        assert_eq!(guests.total_investment, 500000.0);
        assert_eq!(guests.total_equity, 20.0);
    }

    #[test]
    fn test_unparseable_contributes_nothing() {
        let table = prepared("Lori Greiner Investitionssumme\nabc\n50\n");
        assert_eq!(summarize_investors(&table).get(Investor::LoriGreiner).total_investment, 50.0);
    }

    #[test]
    fn test_uncoerced_table() {
        let table = parse_str(
            "Mark Cuban Investitionssumme,Mark Cuban Kapitalbeteiligung\n\
             1000,10\n\
             abc,N/A\n\
             500,2.5\n",
            ',',
        )
        .unwrap();
        let cuban = summarize_investors(&table).get(Investor::MarkCuban);
        assert_eq!(cuban.total_investment, 1500.0);
        assert_eq!(cuban.total_equity, 12.5);
    }
}
