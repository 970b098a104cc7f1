//! Source and canonical column names.
//!
//! The raw export uses English headers; the cleaned table uses the canonical
//! (German) headers that downstream report consumers read.

use crate::models::Investor;

/// Canonical season column.
pub const SEASON: &str = "Staffelnummer";
/// Canonical startup name column.
pub const STARTUP_NAME: &str = "Name des Startups";
/// Canonical industry column.
pub const INDUSTRY: &str = "Branche";
/// Canonical pitcher gender column.
pub const GENDER: &str = "Pitcher Geschlecht";
/// Canonical pitcher home region column.
pub const REGION: &str = "Pitcher Bundesstaat";
pub const ASK_AMOUNT: &str = "Geforderter Betrag (USD)";
pub const ASK_EQUITY: &str = "Gebotene Anteile (%)";
pub const ASK_VALUATION: &str = "Geforderte Bewertung (USD)";
/// Canonical deal flag column (1 = deal, 0 = no deal).
pub const GOT_DEAL: &str = "Deal erhalten";
pub const DEAL_AMOUNT: &str = "Erhaltener Betrag (USD)";
pub const DEAL_EQUITY: &str = "Erhaltene Anteile (%)";
pub const DEAL_VALUATION: &str = "Bewertung anhand Deal (USD)";
pub const SHARKS_IN_DEAL: &str = "Anzahl der Sharks bei Deal";
pub const GUEST_NAME: &str = "Name des Gastes";

/// Sentinel for an unknown gender or region.
pub const UNKNOWN: &str = "Unbekannt";

/// Source columns removed before renaming.
pub const DROPPED_COLUMNS: &[&str] = &[
    "Season Start",
    "Season End",
    "Episode Number",
    "Pitch Number",
    "Original Air Date",
    "Business Description",
    "Pitchers City",
    "Pitchers Average Age",
    "Entrepreneur Names",
    "Company Website",
    "Multiple Entrepreneurs",
    "US Viewership",
    "Royality Deal",
    "Investment Amount Per Shark",
    "Equity Per Shark",
    "Royalty Deal",
    "Loan",
    "Barbara Corcoran Present",
    "Mark Cuban Present",
    "Lori Greiner Present",
    "Robert Herjavec Present",
    "Daymond John Present",
    "Kevin O Leary Present",
];

/// Source header → canonical header.
pub const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("Season Number", SEASON),
    ("Startup Name", STARTUP_NAME),
    ("Industry", INDUSTRY),
    ("Pitchers Gender", GENDER),
    ("Pitchers State", REGION),
    ("Original Ask Amount", ASK_AMOUNT),
    ("Original Offered Equity", ASK_EQUITY),
    ("Valuation Requested", ASK_VALUATION),
    ("Got Deal", GOT_DEAL),
    ("Total Deal Amount", DEAL_AMOUNT),
    ("Total Deal Equity", DEAL_EQUITY),
    ("Deal Valuation", DEAL_VALUATION),
    ("Number of sharks in deal", SHARKS_IN_DEAL),
    ("Barbara Corcoran Investment Amount", "Barbara Corcoran Investitionssumme"),
    ("Barbara Corcoran Investment Equity", "Barbara Corcoran Kapitalbeteiligung"),
    ("Mark Cuban Investment Amount", "Mark Cuban Investitionssumme"),
    ("Mark Cuban Investment Equity", "Mark Cuban Kapitalbeteiligung"),
    ("Lori Greiner Investment Amount", "Lori Greiner Investitionssumme"),
    ("Lori Greiner Investment Equity", "Lori Greiner Kapitalbeteiligung"),
    ("Robert Herjavec Investment Amount", "Robert Herjavec Investitionssumme"),
    ("Robert Herjavec Investment Equity", "Robert Herjavec Kapitalbeteiligung"),
    ("Daymond John Investment Amount", "Daymond John Investitionssumme"),
    ("Daymond John Investment Equity", "Daymond John Kapitalbeteiligung"),
    ("Kevin O Leary Investment Amount", "Kevin O Leary Investitionssumme"),
    ("Kevin O Leary Investment Equity", "Kevin O Leary Kapitalbeteiligung"),
    ("Guest Investment Amount", "Gast Investitionssumme"),
    ("Guest Investment Equity", "Gast Kapitalbeteiligung"),
    ("Guest Name", GUEST_NAME),
];

/// Canonical name for a source header, if it is renamed.
pub fn canonical_name(source: &str) -> Option<&'static str> {
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}

/// Source header for a canonical name, if it came from a rename.
pub fn source_name(canonical: &str) -> Option<&'static str> {
    COLUMN_RENAMES
        .iter()
        .find(|(_, to)| *to == canonical)
        .map(|(from, _)| *from)
}

/// The 14 per-investor financial columns: amount and equity for each shark,
/// then the two guest columns.
pub fn financial_columns() -> Vec<String> {
    Investor::ALL
        .iter()
        .flat_map(|i| [i.amount_column(), i.equity_column()])
        .collect()
}

/// Canonical columns compared in the ask-versus-deal statistics.
pub const ASK_VS_DEAL_COLUMNS: &[&str] = &[
    ASK_EQUITY,
    DEAL_EQUITY,
    ASK_AMOUNT,
    ASK_VALUATION,
    DEAL_AMOUNT,
    DEAL_VALUATION,
];
