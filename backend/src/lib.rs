//! # Sharktank - Shark Tank pitch data pipeline
//!
//! Cleans a raw export of Shark Tank pitches into an analysis-ready table and
//! derives two views of it: per-investor investment totals and a matrix of
//! how often each pair of sharks invested together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌─────────────────┐
//! │ Raw CSV  │──▶│ Normalize │──▶│ Null      │──▶│ Coerce   │──▶│ Cleaned table   │
//! │ (any enc)│   │ drop+name │   │ policy    │   │ numbers  │   └────────┬────────┘
//! └──────────┘   └───────────┘   └───────────┘   └──────────┘            │
//!                                                      ┌─────────────────┴──────┐
//!                                                      ▼                        ▼
//!                                             ┌─────────────────┐    ┌───────────────────┐
//!                                             │ Investor summary│    │ Cooperation matrix│
//!                                             └─────────────────┘    └───────────────────┘
//! ```
//!
//! Each stage takes the table by value and returns a new one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sharktank::{run, PipelineOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = run(&PipelineOptions::new("sharktank.csv", "out"))?;
//!     println!("{} cooperating pairs", report.output.cooperation.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Investors, summaries, cooperation pairs
//! - [`table`] - In-memory table and tri-state cells
//! - [`schema`] - Source and canonical column names
//! - [`parser`] - CSV reading with encoding and delimiter detection
//! - [`transform`] - Pipeline stages and orchestration
//! - [`report`] - Report dataset derived from the artifacts
//! - [`config`] - Environment configuration and logging setup
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;
pub mod schema;
pub mod table;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Report data
pub mod report;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, CsvError, CsvResult, PipelineError, PipelineResult, ServerError,
    ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CooperationMatrix, CooperationPair, CooperationRow, Investor, InvestorSummary, InvestorTotals,
};
pub use table::{Cell, Table};
pub use schema::{COLUMN_RENAMES, DROPPED_COLUMNS};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    parse_str, parse_table_file, write_records, write_table, ParseResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    build_cooperation_matrix, clean_table, coerce_financials, load_cleaned, load_cooperation,
    mark_not_applicable, normalize_columns, process, run, summarize_investors, transform_bytes,
    write_artifacts, ArtifactPaths, CsvInfo, PipelineOptions, PipelineOutput, RunReport,
    CLEANED_FILE, COOPERATION_FILE, COOPERATION_HEADERS, SUMMARY_FILE,
};

// =============================================================================
// Re-exports - Report
// =============================================================================

pub use report::{build_report, describe, find_startup, ColumnStats, Report, ReportFilter};

// =============================================================================
// Re-exports - Config & API
// =============================================================================

pub use config::{Config, LoggingConfig};
pub use api::{start_server, UploadResponse};
