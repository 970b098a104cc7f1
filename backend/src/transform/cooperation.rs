//! Cooperation Matrix Builder.
//!
//! Each row is reduced to a six-bit participation mask (bit `i` set when the
//! `i`-th shark's investment amount is present). Masks are histogrammed into
//! 64 buckets and every roster pair sums the buckets that contain both of its
//! bits, so the per-row work is a single pass regardless of how many pairs a
//! row produces.
//!
//! ```text
//!   row        mask (BC MC LG RH DJ KO)      pairs
//!   {BC, MC}   1 1 0 0 0 0               ->  (BC, MC)
//!   {MC}       0 1 0 0 0 0               ->  -
//! ```

use crate::models::{CooperationMatrix, CooperationPair, Investor};
use crate::table::Table;

const MASK_BUCKETS: usize = 1 << Investor::SHARKS.len();

/// Participation mask of every row, in row order.
pub fn participation_masks(table: &Table) -> Vec<u8> {
    let columns: Vec<(u8, Option<usize>)> = Investor::SHARKS
        .iter()
        .map(|shark| (shark.bit(), table.column_index(&shark.amount_column())))
        .collect();

    table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .filter_map(|(bit, idx)| idx.map(|i| (bit, i)))
                .filter(|(_, i)| row[*i].to_number().is_some())
                .fold(0u8, |mask, (bit, _)| mask | bit)
        })
        .collect()
}

/// Number of unordered pairs a row with this mask contributes: C(k, 2).
pub fn pair_occurrences(mask: u8) -> u64 {
    let k = u64::from(mask.count_ones());
    k * k.saturating_sub(1) / 2
}

/// All 15 unordered shark pairs, members in roster order.
pub fn roster_pairs() -> impl Iterator<Item = (Investor, Investor)> {
    Investor::SHARKS
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| Investor::SHARKS[i + 1..].iter().map(move |&b| (a, b)))
}

/// Count how often each pair of sharks funded the same pitch.
///
/// An amount counts when it reads as a number, so raw text cells work as well
/// as coerced ones. Pairs never observed together are omitted; an empty table
/// yields an empty matrix.
pub fn build_cooperation_matrix(table: &Table) -> CooperationMatrix {
    let mut histogram = [0u64; MASK_BUCKETS];
    for mask in participation_masks(table) {
        histogram[mask as usize] += 1;
    }

    let pairs = roster_pairs().map(|(a, b)| {
        let both = a.bit() | b.bit();
        let count = histogram
            .iter()
            .enumerate()
            .filter(|(mask, _)| (*mask as u8 & both) == both)
            .map(|(_, rows)| rows)
            .sum();
        CooperationPair::new(a, b, count)
    });

    CooperationMatrix::from_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Investor::{BarbaraCorcoran as A, LoriGreiner as C, MarkCuban as B};
    use crate::table::Cell;

    /// Table with one amount column per shark; `rows` lists participants.
    fn table_with(rows: &[&[Investor]]) -> Table {
        let headers: Vec<String> = Investor::SHARKS.iter().map(|s| s.amount_column()).collect();
        let rows = rows
            .iter()
            .map(|present| {
                Investor::SHARKS
                    .iter()
                    .map(|s| {
                        if present.contains(s) {
                            Cell::Number(1000.0)
                        } else {
                            Cell::Missing
                        }
                    })
                    .collect()
            })
            .collect();
        Table::new(headers, rows)
    }

    #[test]
    fn test_counts_per_pair() {
        let table = table_with(&[&[A, B], &[A, B, C], &[A]]);
        let matrix = build_cooperation_matrix(&table);

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.count(A, B), 2);
        assert_eq!(matrix.count(A, C), 1);
        assert_eq!(matrix.count(B, C), 1);
        assert_eq!(matrix.pairs()[0], CooperationPair::new(A, B, 2));
    }

    #[test]
    fn test_pair_occurrences() {
        assert_eq!(pair_occurrences(0b000000), 0);
        assert_eq!(pair_occurrences(0b000001), 0);
        assert_eq!(pair_occurrences(0b000011), 1);
        assert_eq!(pair_occurrences(0b000111), 3);
        assert_eq!(pair_occurrences(0b111111), 15);
    }

    #[test]
    fn test_total_matches_row_combinations() {
        let table = table_with(&[&[], &[A], &[A, B], &[A, B, C], &Investor::SHARKS]);
        let matrix = build_cooperation_matrix(&table);
        let expected: u64 = participation_masks(&table).into_iter().map(pair_occurrences).sum();
        assert_eq!(matrix.total(), expected);
        assert_eq!(expected, 19);
    }

    #[test]
    fn test_zero_investment_counts_as_participation() {
        let mut table = table_with(&[&[A]]);
        table = table.map_column(&B.amount_column(), |_| Cell::Number(0.0));
        let matrix = build_cooperation_matrix(&table);
        assert_eq!(matrix.count(A, B), 1);
    }

    #[test]
    fn test_empty_table() {
        let matrix = build_cooperation_matrix(&Table::default());
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_guest_is_never_a_participant() {
        let table = Table::new(
            vec![A.amount_column(), Investor::Guest.amount_column()],
            vec![vec![Cell::Number(1.0), Cell::Number(2.0)]],
        );
        assert!(build_cooperation_matrix(&table).is_empty());
    }

    #[test]
    fn test_roster_pairs_in_roster_order() {
        let pairs: Vec<_> = roster_pairs().collect();
        assert_eq!(pairs.len(), 15);
        assert_eq!(pairs[0], (A, B));
        assert_eq!(pairs[14], (Investor::DaymondJohn, Investor::KevinOLeary));
    }

    #[test]
    fn test_uncoerced_amounts_count() {
        let table = Table::new(
            vec![A.amount_column(), B.amount_column(), C.amount_column()],
            vec![
                vec![Cell::from_field("50000"), Cell::from_field("25000"), Cell::from_field("")],
                vec![Cell::from_field("abc"), Cell::from_field("1000"), Cell::from_field("N/A")],
            ],
        );
        let matrix = build_cooperation_matrix(&table);
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.count(A, B), 1);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let table = table_with(&[&[C, B], &[B, C], &[A, C]]);
        assert_eq!(build_cooperation_matrix(&table), build_cooperation_matrix(&table));
        let first = build_cooperation_matrix(&table).pairs()[0];
        assert_eq!((first.investor_a, first.investor_b, first.count), (B, C, 2));
    }
}
