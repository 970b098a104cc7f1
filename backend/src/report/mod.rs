//! Report dataset.
//!
//! Everything a report front end needs from the pipeline artifacts, computed
//! here so that the renderer only draws: filter options, filtered rows, deal
//! breakdowns, investment ranking and cooperation totals. Layout and charts
//! are not this crate's concern.

pub mod stats;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::{CooperationMatrix, Investor};
use crate::schema::{ASK_VS_DEAL_COLUMNS, GENDER, GOT_DEAL, INDUSTRY, SEASON, STARTUP_NAME};
use crate::table::{parse_finite, Cell, Table};
use crate::transform::summarize_investors;

pub use stats::{describe, describe_complete_rows, ColumnStats};

/// Label for a pitch that closed a deal.
pub const DEAL: &str = "Deal";
/// Label for a pitch without a deal.
pub const NO_DEAL: &str = "No-Deal";

// =============================================================================
// Filtering
// =============================================================================

/// Row selection. An unset field selects everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(default)]
    pub seasons: Option<Vec<String>>,
    #[serde(default)]
    pub industries: Option<Vec<String>>,
    #[serde(default)]
    pub genders: Option<Vec<String>>,
    /// Raw deal flags ("1", "0") or labels ("Deal", "No-Deal").
    #[serde(default)]
    pub deals: Option<Vec<String>>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.seasons.is_none() && self.industries.is_none() && self.genders.is_none() && self.deals.is_none()
    }

    /// Whether `row` of `table` passes every set selection.
    pub fn matches(&self, table: &Table, row: usize) -> bool {
        selected(table, row, SEASON, self.seasons.as_deref())
            && selected(table, row, INDUSTRY, self.industries.as_deref())
            && selected(table, row, GENDER, self.genders.as_deref())
            && self.deal_selected(table, row)
    }

    pub fn apply(&self, table: &Table) -> Table {
        if self.is_empty() {
            return table.clone();
        }
        table.filter_rows(|t, row| self.matches(t, row))
    }

    fn deal_selected(&self, table: &Table, row: usize) -> bool {
        let Some(wanted) = self.deals.as_deref() else {
            return true;
        };
        let cell = table.cell(row, GOT_DEAL);
        let label = cell.and_then(deal_label);
        wanted.iter().any(|w| {
            label.is_some_and(|l| l.eq_ignore_ascii_case(w))
                || cell.is_some_and(|c| cell_matches(c, w))
        })
    }
}

fn selected(table: &Table, row: usize, column: &str, wanted: Option<&[String]>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };
    match table.cell(row, column) {
        Some(cell) => wanted.iter().any(|w| cell_matches(cell, w)),
        None => false,
    }
}

/// Label equality, with "1" and "1.0" treated as the same value.
fn cell_matches(cell: &Cell, wanted: &str) -> bool {
    match (cell.to_number(), parse_finite(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => cell.label().is_some_and(|l| l == wanted.trim()),
    }
}

/// "Deal" for 1, "No-Deal" for 0, `None` for anything else.
pub fn deal_label(cell: &Cell) -> Option<&'static str> {
    match cell.to_number() {
        Some(v) if v == 1.0 => Some(DEAL),
        Some(v) if v == 0.0 => Some(NO_DEAL),
        _ => None,
    }
}

/// Values a filter can choose from, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub seasons: Vec<String>,
    pub industries: Vec<String>,
    pub genders: Vec<String>,
    pub deals: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        Self {
            seasons: table.distinct_labels(SEASON),
            industries: table.distinct_labels(INDUSTRY),
            genders: table.distinct_labels(GENDER),
            deals: table.distinct_labels(GOT_DEAL),
        }
    }
}

// =============================================================================
// Breakdown types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDeals {
    pub season: String,
    pub outcome: String,
    pub count: u64,
}

/// Deal and no-deal counts for one category value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSplit {
    pub label: String,
    pub deals: u64,
    pub no_deals: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorAmount {
    pub investor: String,
    pub amount: f64,
}

/// Complete report dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub filter: ReportFilter,
    pub filter_options: FilterOptions,
    pub row_count: usize,
    pub rows: Vec<Value>,
    pub deals_per_season: Vec<SeasonDeals>,
    pub deals_per_industry: Vec<DealSplit>,
    pub gender_distribution: Vec<LabelCount>,
    pub deals_per_gender: Vec<DealSplit>,
    pub investment_ranking: Vec<InvestorAmount>,
    pub shark_cooperations: Vec<LabelCount>,
    pub most_cooperative: Option<LabelCount>,
    pub total_cooperations: u64,
    pub ask_vs_deal: Vec<ColumnStats>,
}

/// Build the report. Filter options come from the whole table; every
/// table-derived section uses the filtered rows. Cooperation figures come
/// from the matrix as a whole.
pub fn build_report(cleaned: &Table, cooperation: &CooperationMatrix, filter: &ReportFilter) -> Report {
    let filtered = filter.apply(cleaned);
    let most_cooperative_rank = shark_cooperations(cooperation);

    Report {
        filter: filter.clone(),
        filter_options: FilterOptions::from_table(cleaned),
        row_count: filtered.row_count(),
        rows: rows_to_json(&filtered),
        deals_per_season: deals_per_season(&filtered),
        deals_per_industry: deal_split(&filtered, INDUSTRY),
        gender_distribution: value_counts(&filtered, GENDER),
        deals_per_gender: deal_split(&filtered, GENDER),
        investment_ranking: investment_ranking(&filtered),
        most_cooperative: most_cooperative(&most_cooperative_rank),
        shark_cooperations: most_cooperative_rank,
        total_cooperations: cooperation.total(),
        ask_vs_deal: describe_complete_rows(&filtered, ASK_VS_DEAL_COLUMNS),
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Pitch counts per (season, outcome), ordered by season then no-deal first.
pub fn deals_per_season(table: &Table) -> Vec<SeasonDeals> {
    let mut counts: BTreeMap<(SortKey, u8), (String, &'static str, u64)> = BTreeMap::new();
    for row in 0..table.row_count() {
        let Some(season) = table.cell(row, SEASON).and_then(Cell::label) else {
            continue;
        };
        let Some(outcome) = table.cell(row, GOT_DEAL).and_then(deal_label) else {
            continue;
        };
        let order = u8::from(outcome == DEAL);
        let key = (SortKey::of(&season), order);
        counts.entry(key).or_insert((season, outcome, 0)).2 += 1;
    }

    counts
        .into_values()
        .map(|(season, outcome, count)| SeasonDeals {
            season,
            outcome: outcome.to_string(),
            count,
        })
        .collect()
}

/// Deal/no-deal counts per value of `column`, most deals first.
pub fn deal_split(table: &Table, column: &str) -> Vec<DealSplit> {
    let mut splits: Vec<DealSplit> = Vec::new();
    for row in 0..table.row_count() {
        let Some(label) = table.cell(row, column).and_then(Cell::label) else {
            continue;
        };
        let Some(outcome) = table.cell(row, GOT_DEAL).and_then(deal_label) else {
            continue;
        };
        let idx = match splits.iter().position(|s| s.label == label) {
            Some(i) => i,
            None => {
                splits.push(DealSplit { label, deals: 0, no_deals: 0 });
                splits.len() - 1
            }
        };
        if outcome == DEAL {
            splits[idx].deals += 1;
        } else {
            splits[idx].no_deals += 1;
        }
    }
    // Stable sort keeps first-seen order among ties.
    splits.sort_by(|a, b| b.deals.cmp(&a.deals));
    splits
}

/// Occurrences of each non-missing value of `column`, most frequent first.
pub fn value_counts(table: &Table, column: &str) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in table.column(column).into_iter().filter_map(Cell::label) {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(c) => c.count += 1,
            None => counts.push(LabelCount { label, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Total invested per investor (guests included), highest first.
pub fn investment_ranking(table: &Table) -> Vec<InvestorAmount> {
    summarize_investors(table)
        .ranked_by_investment()
        .into_iter()
        .map(|(investor, amount)| InvestorAmount {
            investor: investor.name().to_string(),
            amount,
        })
        .collect()
}

/// Cooperations per shark: the sum of counts of every pair it belongs to.
///
/// Sharks are listed in order of first appearance in column A, then column B.
pub fn shark_cooperations(matrix: &CooperationMatrix) -> Vec<LabelCount> {
    let mut order: Vec<Investor> = Vec::new();
    let appearances = matrix
        .pairs()
        .iter()
        .map(|p| p.investor_a)
        .chain(matrix.pairs().iter().map(|p| p.investor_b));
    for investor in appearances {
        if !order.contains(&investor) {
            order.push(investor);
        }
    }

    order
        .into_iter()
        .map(|investor| LabelCount {
            label: investor.name().to_string(),
            count: matrix
                .pairs()
                .iter()
                .filter(|p| p.involves(investor))
                .map(|p| p.count)
                .sum(),
        })
        .collect()
}

/// First shark with the highest cooperation total.
pub fn most_cooperative(totals: &[LabelCount]) -> Option<LabelCount> {
    let max = totals.iter().map(|t| t.count).max()?;
    totals.iter().find(|t| t.count == max).cloned()
}

/// Rows whose startup name equals `name` exactly.
pub fn find_startup(table: &Table, name: &str) -> Vec<Value> {
    let matches = table.filter_rows(|t, row| {
        t.cell(row, STARTUP_NAME)
            .and_then(Cell::label)
            .is_some_and(|l| l == name)
    });
    rows_to_json(&matches)
}

/// Rows as JSON objects keyed by header; missing cells become `null`.
pub fn rows_to_json(table: &Table) -> Vec<Value> {
    table
        .rows()
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = table
                .headers()
                .iter()
                .zip(row)
                .map(|(h, c)| (h.clone(), cell_to_json(c)))
                .collect();
            Value::Object(obj)
        })
        .collect()
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Missing => Value::Null,
        Cell::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        other => Value::String(other.label().unwrap_or_default()),
    }
}

/// Orders numeric labels numerically and places them before text labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(OrderedF64),
    Text(String),
}

impl SortKey {
    fn of(label: &str) -> Self {
        match parse_finite(label) {
            Some(n) => SortKey::Number(OrderedF64(n)),
            None => SortKey::Text(label.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedF64(f64);

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
