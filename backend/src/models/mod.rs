//! Domain models for the Shark Tank data pipeline.
//!
//! - [`Investor`] - The closed roster of six sharks plus the guest slot
//! - [`InvestorTotals`] / [`InvestorSummary`] - Per-investor sums
//! - [`CooperationPair`] / [`CooperationMatrix`] - Pairwise co-investment counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Investor
// =============================================================================

/// An investor identity.
///
/// The six sharks are a closed set; `Guest` stands for any other investor on
/// a pitch. Declaration order is the canonical roster order and drives `Ord`.
/// Serialized as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Investor {
    #[serde(rename = "Barbara Corcoran")]
    BarbaraCorcoran,
    #[serde(rename = "Mark Cuban")]
    MarkCuban,
    #[serde(rename = "Lori Greiner")]
    LoriGreiner,
    #[serde(rename = "Robert Herjavec")]
    RobertHerjavec,
    #[serde(rename = "Daymond John")]
    DaymondJohn,
    #[serde(rename = "Kevin O Leary")]
    KevinOLeary,
    #[serde(rename = "Guests")]
    Guest,
}

impl Investor {
    /// The six named sharks in roster order.
    pub const SHARKS: [Investor; 6] = [
        Investor::BarbaraCorcoran,
        Investor::MarkCuban,
        Investor::LoriGreiner,
        Investor::RobertHerjavec,
        Investor::DaymondJohn,
        Investor::KevinOLeary,
    ];

    /// Every investor identity, sharks first, guest last.
    pub const ALL: [Investor; 7] = [
        Investor::BarbaraCorcoran,
        Investor::MarkCuban,
        Investor::LoriGreiner,
        Investor::RobertHerjavec,
        Investor::DaymondJohn,
        Investor::KevinOLeary,
        Investor::Guest,
    ];

    /// Name as it appears in column headers ("Gast" for the guest slot).
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Self::BarbaraCorcoran => "Barbara Corcoran",
            Self::MarkCuban => "Mark Cuban",
            Self::LoriGreiner => "Lori Greiner",
            Self::RobertHerjavec => "Robert Herjavec",
            Self::DaymondJohn => "Daymond John",
            Self::KevinOLeary => "Kevin O Leary",
            Self::Guest => "Gast",
        }
    }

    /// Display name used in summaries and the cooperation matrix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Guest => "Guests",
            other => other.column_prefix(),
        }
    }

    /// Parse a display name or column prefix.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.name() == trimmed || i.column_prefix() == trimmed)
    }

    /// Canonical investment-amount column, e.g. "Mark Cuban Investitionssumme".
    pub fn amount_column(&self) -> String {
        format!("{} Investitionssumme", self.column_prefix())
    }

    /// Canonical equity-percentage column, e.g. "Mark Cuban Kapitalbeteiligung".
    pub fn equity_column(&self) -> String {
        format!("{} Kapitalbeteiligung", self.column_prefix())
    }

    /// Position in the roster (0..=6).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Bit used in a participation mask. Only meaningful for sharks.
    pub fn bit(&self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Investor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Investor Summary
// =============================================================================

/// Totals for one investor over all pitches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorTotals {
    /// Sum of invested amounts in USD.
    #[serde(rename = "Total Investment (USD)")]
    pub total_investment: f64,
    /// Sum of equity percentages.
    #[serde(rename = "Total Equity (%)")]
    pub total_equity: f64,
}

/// Investor identity → totals, always holding all seven identities.
///
/// Serializes as a map keyed by display name, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InvestorSummary {
    totals: BTreeMap<Investor, InvestorTotals>,
}

impl InvestorSummary {
    pub fn new(totals: BTreeMap<Investor, InvestorTotals>) -> Self {
        Self { totals }
    }

    pub fn get(&self, investor: Investor) -> InvestorTotals {
        self.totals.get(&investor).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Investor, InvestorTotals)> + '_ {
        self.totals.iter().map(|(i, t)| (*i, *t))
    }

    /// Investors sorted by total investment, highest first.
    pub fn ranked_by_investment(&self) -> Vec<(Investor, f64)> {
        let mut ranked: Vec<(Investor, f64)> = self
            .iter()
            .map(|(i, t)| (i, t.total_investment))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

// =============================================================================
// Cooperation Matrix
// =============================================================================

/// An unordered pair of sharks with the number of pitches both funded.
///
/// `investor_a` always precedes `investor_b` in roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooperationPair {
    pub investor_a: Investor,
    pub investor_b: Investor,
    pub count: u64,
}

impl CooperationPair {
    /// Build a pair, ordering the members by roster position.
    pub fn new(x: Investor, y: Investor, count: u64) -> Self {
        let (investor_a, investor_b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            investor_a,
            investor_b,
            count,
        }
    }

    pub fn involves(&self, investor: Investor) -> bool {
        self.investor_a == investor || self.investor_b == investor
    }
}

/// Serialized form of a matrix row, as written to the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooperationRow {
    #[serde(rename = "Shark A")]
    pub shark_a: String,
    #[serde(rename = "Shark B")]
    pub shark_b: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

impl From<&CooperationPair> for CooperationRow {
    fn from(pair: &CooperationPair) -> Self {
        Self {
            shark_a: pair.investor_a.name().to_string(),
            shark_b: pair.investor_b.name().to_string(),
            count: pair.count,
        }
    }
}

/// Observed co-participations, sorted by count (descending) then roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooperationMatrix {
    pairs: Vec<CooperationPair>,
}

impl CooperationMatrix {
    /// Build from pairs; zero counts are discarded and order is normalized.
    pub fn from_pairs(pairs: impl IntoIterator<Item = CooperationPair>) -> Self {
        let mut pairs: Vec<CooperationPair> = pairs.into_iter().filter(|p| p.count > 0).collect();
        pairs.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.investor_a.cmp(&b.investor_a))
                .then(a.investor_b.cmp(&b.investor_b))
        });
        Self { pairs }
    }

    pub fn pairs(&self) -> &[CooperationPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Count for an unordered pair; 0 when never observed.
    pub fn count(&self, x: Investor, y: Investor) -> u64 {
        let key = CooperationPair::new(x, y, 0);
        self.pairs
            .iter()
            .find(|p| p.investor_a == key.investor_a && p.investor_b == key.investor_b)
            .map(|p| p.count)
            .unwrap_or(0)
    }

    /// Sum of all pair occurrences.
    pub fn total(&self) -> u64 {
        self.pairs.iter().map(|p| p.count).sum()
    }

    pub fn rows(&self) -> Vec<CooperationRow> {
        self.pairs.iter().map(CooperationRow::from).collect()
    }
}
