//! Runtime configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every variable has a default, so an empty environment is valid.
//!
//! | Variable                  | Default                          |
//! |---------------------------|----------------------------------|
//! | `SHARKTANK_INPUT`         | `sharktank.csv`                  |
//! | `SHARKTANK_OUTPUT_DIR`    | `.`                              |
//! | `SHARKTANK_CLEANED_FILE`  | `sharktank_cleaned.csv`          |
//! | `SHARKTANK_COOPERATION_FILE` | `shark_cooperation_matrix.csv` |
//! | `SHARKTANK_SUMMARY_FILE`  | `shark_summary.json`             |
//! | `SHARKTANK_DELIMITER`     | auto-detect                      |
//! | `SHARKTANK_PORT`          | `3000`                           |
//! | `SHARKTANK_LOG_LEVEL`     | `info`                           |
//! | `SHARKTANK_LOG_FORMAT`    | `pretty` (`json` for JSON lines) |

use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, ConfigResult};
use crate::transform::{ArtifactPaths, PipelineOptions, CLEANED_FILE, COOPERATION_FILE, SUMMARY_FILE};

/// Default raw export location.
pub const DEFAULT_INPUT: &str = "sharktank.csv";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    ///
    /// A second call is a no-op.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub cleaned_file: String,
    pub cooperation_file: String,
    pub summary_file: String,
    pub delimiter: Option<char>,
    pub port: u16,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            cleaned_file: CLEANED_FILE.to_string(),
            cooperation_file: COOPERATION_FILE.to_string(),
            summary_file: SUMMARY_FILE.to_string(),
            delimiter: None,
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load from the environment after reading `.env` if present.
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("SHARKTANK_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "SHARKTANK_PORT".into(),
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let delimiter = match get("SHARKTANK_DELIMITER") {
            Some(raw) => Some(parse_delimiter(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "SHARKTANK_DELIMITER".into(),
                value: raw.clone(),
                reason: "expected a single ASCII character or \\t".into(),
            })?),
            None => None,
        };

        let format = get("SHARKTANK_LOG_FORMAT").unwrap_or(defaults.logging.format);
        if !matches!(format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                key: "SHARKTANK_LOG_FORMAT".into(),
                value: format,
                reason: "expected pretty or json".into(),
            });
        }

        Ok(Self {
            input: get("SHARKTANK_INPUT").map(PathBuf::from).unwrap_or(defaults.input),
            output_dir: get("SHARKTANK_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            cleaned_file: get("SHARKTANK_CLEANED_FILE").unwrap_or(defaults.cleaned_file),
            cooperation_file: get("SHARKTANK_COOPERATION_FILE").unwrap_or(defaults.cooperation_file),
            summary_file: get("SHARKTANK_SUMMARY_FILE").unwrap_or(defaults.summary_file),
            delimiter,
            port,
            logging: LoggingConfig {
                level: get("SHARKTANK_LOG_LEVEL").unwrap_or(defaults.logging.level),
                format,
            },
        })
    }

    /// Artifact locations under `output_dir`.
    pub fn artifacts(&self) -> ArtifactPaths {
        ArtifactPaths {
            cleaned: self.output_dir.join(&self.cleaned_file),
            cooperation: self.output_dir.join(&self.cooperation_file),
            summary: Some(self.output_dir.join(&self.summary_file)),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            input: self.input.clone(),
            delimiter: self.delimiter,
            artifacts: self.artifacts(),
        }
    }
}

/// Single ASCII character, or the escapes `\t` and `tab`.
pub fn parse_delimiter(raw: &str) -> Option<char> {
    match raw {
        "\\t" | "tab" | "\t" => Some('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Some(c),
                _ => None,
            }
        }
    }
}
