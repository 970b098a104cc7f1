//! Transformation module.
//!
//! The cleaning stages run in this order, each consuming the previous table:
//! - Normalize: drop/rename columns, fill unknown categories
//! - Null policy: mark non-participation in financial columns
//! - Coerce: financial columns to numbers
//!
//! Then two read-only views are derived from the cleaned table:
//! - Summary: per-investor totals
//! - Cooperation: pairwise co-investment counts
//!
//! Pipeline ties the steps to file input and output.

pub mod coerce;
pub mod cooperation;
pub mod normalize;
pub mod null_policy;
pub mod pipeline;
pub mod summary;

pub use coerce::coerce_financials;
pub use cooperation::build_cooperation_matrix;
pub use normalize::normalize_columns;
pub use null_policy::mark_not_applicable;
pub use pipeline::*;
pub use summary::summarize_investors;
