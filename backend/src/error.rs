//! Error types for the Shark Tank data pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - Reading, decoding and writing delimited files
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ConfigError`] - Invalid environment configuration
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Per-column and per-cell anomalies (an absent column, an unparseable number)
//! never surface as errors: the stages degrade them to "missing".

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing delimited files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The source file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read or write a file.
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed delimited content.
    #[error("Invalid CSV at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty input (no header line).
    #[error("CSV file is empty")]
    EmptyFile,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::IoError(io),
            other => CsvError::ParseError {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// Returned by [`crate::transform::pipeline::run`]. Only a source that cannot
/// be read or an artifact that cannot be persisted aborts a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV reading/writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// An output artifact could not be written.
    #[error("Failed to write artifact {}: {message}", .path.display())]
    ArtifactWrite { path: PathBuf, message: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// True when the run failed because the source file does not exist.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, PipelineError::Csv(CsvError::NotFound(_)))
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be interpreted.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// A pipeline artifact has not been produced yet.
    #[error("File not found: {0}")]
    ArtifactMissing(String),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
