//! High-level pipeline API.
//!
//! Combines every step of a run: reading the raw export, the three cleaning
//! stages, the two derived views, and persisting the artifacts.
//!
//! # Example
//!
//! ```rust,ignore
//! use sharktank::{run, PipelineOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = run(&PipelineOptions::new("sharktank.csv", "out"))?;
//!     println!("{} pitches, {} cooperating pairs",
//!         report.output.csv_info.row_count,
//!         report.output.cooperation.len());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::coerce::coerce_financials;
use super::cooperation::build_cooperation_matrix;
use super::normalize::normalize_columns;
use super::null_policy::mark_not_applicable;
use super::summary::summarize_investors;
use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::{CsvError, PipelineError, PipelineResult};
use crate::models::{CooperationMatrix, CooperationPair, CooperationRow, Investor, InvestorSummary};
use crate::parser::{
    parse_bytes_auto, parse_file_auto, parse_table_file, write_records, write_table, ParseResult,
};
use crate::table::Table;

/// Default file name of the cleaned table.
pub const CLEANED_FILE: &str = "sharktank_cleaned.csv";
/// Default file name of the cooperation matrix.
pub const COOPERATION_FILE: &str = "shark_cooperation_matrix.csv";
/// Default file name of the investor summary.
pub const SUMMARY_FILE: &str = "shark_summary.json";

/// Header row of the cooperation matrix artifact.
pub const COOPERATION_HEADERS: [&str; 3] = ["Shark A", "Shark B", "Count"];

/// Where a run writes its artifacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactPaths {
    pub cleaned: PathBuf,
    pub cooperation: PathBuf,
    /// `None` skips the summary artifact.
    pub summary: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            cleaned: dir.join(CLEANED_FILE),
            cooperation: dir.join(COOPERATION_FILE),
            summary: Some(dir.join(SUMMARY_FILE)),
        }
    }
}

/// Options for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Raw export to read
    pub input: PathBuf,

    /// Delimiter override (auto-detect if `None`)
    pub delimiter: Option<char>,

    /// Output locations
    pub artifacts: ArtifactPaths,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            input: input.into(),
            delimiter: None,
            artifacts: ArtifactPaths::in_dir(output_dir),
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Everything derived from one raw table.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Cleaned, coerced table
    pub cleaned: Table,

    /// Per-investor totals
    pub summary: InvestorSummary,

    /// Pairwise co-investment counts
    pub cooperation: CooperationMatrix,

    /// Raw input metadata
    pub csv_info: CsvInfo,
}

/// Outcome of a persisted run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub finished_at: String,
    pub output: PipelineOutput,
    pub artifacts: ArtifactPaths,
}

/// Run the three cleaning stages on a raw table.
pub fn clean_table(raw: Table) -> Table {
    let normalized = normalize_columns(raw);
    let marked = mark_not_applicable(normalized);
    coerce_financials(marked)
}

/// Clean a parsed table and derive the summary and cooperation matrix.
pub fn process(parse_result: ParseResult) -> PipelineOutput {
    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parse_result.delimiter)));
    log_success(format!("Read {} rows", parse_result.table.row_count()));

    let csv_info = CsvInfo {
        encoding: parse_result.encoding,
        delimiter: parse_result.delimiter,
        headers: parse_result.table.headers().to_vec(),
        row_count: parse_result.table.row_count(),
    };

    log_info("🧹 Normalizing columns and applying null policy...");
    let cleaned = clean_table(parse_result.table);
    log_success(format!("{} columns after cleaning", cleaned.headers().len()));

    log_info("💰 Summarizing investments...");
    let summary = summarize_investors(&cleaned);
    for (investor, amount) in summary.ranked_by_investment() {
        log_info(format!("{:<18} {:>16.0} USD", investor.name(), amount));
    }

    log_info("🤝 Building cooperation matrix...");
    let cooperation = build_cooperation_matrix(&cleaned);
    log_success(format!(
        "{} cooperating pairs, {} co-investments",
        cooperation.len(),
        cooperation.total()
    ));

    PipelineOutput {
        cleaned,
        summary,
        cooperation,
        csv_info,
    }
}

/// Process raw CSV bytes in memory. Nothing is written.
pub fn transform_bytes(bytes: &[u8], delimiter: Option<char>) -> PipelineResult<PipelineOutput> {
    let parse_result = parse_bytes_auto(bytes, delimiter)?;
    Ok(process(parse_result))
}

/// Run the full pipeline and persist its artifacts.
///
/// A missing input aborts before anything is written. Artifacts are staged
/// next to their destinations and only moved into place once all of them
/// have been written.
pub fn run(options: &PipelineOptions) -> PipelineResult<RunReport> {
    log_info(format!("📖 Reading {}...", options.input.display()));
    let parse_result = parse_file_auto(&options.input, options.delimiter)?;

    let output = process(parse_result);
    write_artifacts(&output, &options.artifacts)?;

    Ok(RunReport {
        run_id: uuid::Uuid::new_v4().to_string(),
        finished_at: chrono::Utc::now().to_rfc3339(),
        output,
        artifacts: options.artifacts.clone(),
    })
}

/// Write all artifacts of `output`, all or nothing.
pub fn write_artifacts(output: &PipelineOutput, paths: &ArtifactPaths) -> PipelineResult<()> {
    log_info("💾 Writing artifacts...");

    let cleaned = stage(&paths.cleaned, |w| Ok(write_table(&output.cleaned, w)?))?;
    let cooperation = stage(&paths.cooperation, |w| {
        Ok(write_records(&COOPERATION_HEADERS, &output.cooperation.rows(), w)?)
    })?;
    let summary = match &paths.summary {
        Some(path) => Some((
            stage(path, |w| Ok(serde_json::to_writer_pretty(w, &output.summary)?))?,
            path,
        )),
        None => None,
    };

    let mut staged = vec![
        (cleaned, paths.cleaned.as_path()),
        (cooperation, paths.cooperation.as_path()),
    ];
    if let Some((file, path)) = summary {
        staged.push((file, path.as_path()));
    }
    promote_all(staged)?;

    log_success(format!("Cleaned table: {}", paths.cleaned.display()));
    log_success(format!("Cooperation matrix: {}", paths.cooperation.display()));
    if let Some(path) = &paths.summary {
        log_success(format!("Investor summary: {}", path.display()));
    }
    Ok(())
}

/// Write to a temporary file in the destination's directory.
fn stage<F>(dest: &Path, write: F) -> PipelineResult<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> PipelineResult<()>,
{
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| artifact_error(dest, e))?;

    let mut file = NamedTempFile::new_in(&dir).map_err(|e| artifact_error(dest, e))?;
    {
        let mut writer = BufWriter::new(&mut file);
        write(&mut writer)?;
        writer.flush().map_err(|e| artifact_error(dest, e))?;
    }
    Ok(file)
}

/// Move staged files onto their destinations.
///
/// Every destination is checked before the first move. If a move still
/// fails, destinations already replaced get their previous content back.
fn promote_all(staged: Vec<(NamedTempFile, &Path)>) -> PipelineResult<()> {
    for (_, dest) in &staged {
        check_destination(dest)?;
    }
    let backups = staged
        .iter()
        .map(|(_, dest)| backup(dest))
        .collect::<PipelineResult<Vec<_>>>()?;

    let mut promoted: Vec<(&Path, Option<NamedTempFile>)> = Vec::new();
    for ((file, dest), previous) in staged.into_iter().zip(backups) {
        if let Err(e) = file.persist(dest) {
            let err = artifact_error(dest, e.error);
            for (path, previous) in promoted.into_iter().rev() {
                restore(path, previous);
            }
            return Err(err);
        }
        promoted.push((dest, previous));
    }
    Ok(())
}

fn check_destination(dest: &Path) -> PipelineResult<()> {
    let metadata = match fs::metadata(dest) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(artifact_error(dest, e)),
    };
    let problem = if metadata.is_dir() {
        "destination is a directory"
    } else if metadata.permissions().readonly() {
        "destination is read-only"
    } else {
        return Ok(());
    };
    Err(PipelineError::ArtifactWrite {
        path: dest.to_path_buf(),
        message: problem.to_string(),
    })
}

/// Copy of the current destination content, if there is one.
fn backup(dest: &Path) -> PipelineResult<Option<NamedTempFile>> {
    if !dest.is_file() {
        return Ok(None);
    }
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let copy = NamedTempFile::new_in(dir).map_err(|e| artifact_error(dest, e))?;
    fs::copy(dest, copy.path()).map_err(|e| artifact_error(dest, e))?;
    Ok(Some(copy))
}

fn restore(dest: &Path, previous: Option<NamedTempFile>) {
    let restored = match previous {
        Some(copy) => copy.persist(dest).map(|_| ()).map_err(|e| e.error),
        None => fs::remove_file(dest),
    };
    if let Err(e) = restored {
        log_warning(format!("Could not restore {}: {}", dest.display(), e));
    }
}

fn artifact_error(path: &Path, err: std::io::Error) -> PipelineError {
    PipelineError::ArtifactWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Reload a cleaned table artifact, restoring numeric financial columns.
///
/// Rows that were written with every cell empty come back as rows too.
pub fn load_cleaned(path: impl AsRef<Path>) -> PipelineResult<Table> {
    let table = parse_table_file(path)?;
    Ok(coerce_financials(table))
}

/// Reload a cooperation matrix artifact.
///
/// Rows naming someone outside the shark roster are skipped with a warning.
pub fn load_cooperation(path: impl AsRef<Path>) -> PipelineResult<CooperationMatrix> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CsvError::NotFound(path.to_path_buf()).into());
    }

    let mut reader = csv::Reader::from_path(path).map_err(CsvError::from)?;
    let mut pairs = Vec::new();
    for row in reader.deserialize::<CooperationRow>() {
        let row = row.map_err(CsvError::from)?;
        match (Investor::from_name(&row.shark_a), Investor::from_name(&row.shark_b)) {
            (Some(a), Some(b)) if a != b => pairs.push(CooperationPair::new(a, b, row.count)),
            _ => log_warning(format!(
                "Skipping unknown pair ({}, {})",
                row.shark_a, row.shark_b
            )),
        }
    }
    Ok(CooperationMatrix::from_pairs(pairs))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use tempfile::tempdir;

    const RAW: &str = "Season Number,Startup Name,Pitchers Gender,Pitchers State,\
Barbara Corcoran Investment Amount,Barbara Corcoran Investment Equity,\
Mark Cuban Investment Amount,Mark Cuban Investment Equity,Loan\n\
1,Alpha,Male,CA,1000,10,2000,10,\n\
1,Beta,,,500,5,,,\n";

    #[test]
    fn test_end_to_end_in_memory() {
        let output = transform_bytes(RAW.as_bytes(), None).unwrap();

        assert_eq!(output.cleaned.row_count(), 2);
        assert!(output
            .cleaned
            .cell(1, "Mark Cuban Investitionssumme")
            .unwrap()
            .is_missing());
        assert_eq!(output.summary.get(Investor::BarbaraCorcoran).total_investment, 1500.0);
        assert_eq!(output.summary.get(Investor::MarkCuban).total_investment, 2000.0);
        assert_eq!(
            output.cooperation.pairs(),
            &[CooperationPair::new(Investor::BarbaraCorcoran, Investor::MarkCuban, 1)]
        );
        assert!(!output.cleaned.has_column("Loan"));
    }

    #[test]
    fn test_run_writes_artifacts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sharktank.csv");
        fs::write(&input, RAW).unwrap();

        let options = PipelineOptions::new(&input, dir.path().join("out"));
        let report = run(&options).unwrap();

        assert!(report.artifacts.cleaned.exists());
        assert!(report.artifacts.cooperation.exists());
        let summary_path = report.artifacts.summary.clone().unwrap();
        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
        assert_eq!(summary["Barbara Corcoran"]["Total Investment (USD)"], 1500.0);
        assert_eq!(summary.as_object().unwrap().len(), 7);

        let matrix = fs::read_to_string(&report.artifacts.cooperation).unwrap();
        let lines: Vec<&str> = matrix.lines().collect();
        assert_eq!(lines, vec!["Shark A,Shark B,Count", "Barbara Corcoran,Mark Cuban,1"]);
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let options = PipelineOptions::new(dir.path().join("absent.csv"), &out);

        let err = run(&options).unwrap_err();
        assert!(err.is_missing_source());
        assert!(!out.exists());
    }

    #[test]
    fn test_reload_artifacts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, RAW).unwrap();
        let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();

        let cleaned = load_cleaned(&report.artifacts.cleaned).unwrap();
        assert_eq!(cleaned.headers(), report.output.cleaned.headers());
        assert_eq!(
            cleaned.cell(0, "Mark Cuban Investitionssumme"),
            Some(&Cell::Number(2000.0))
        );

        let matrix = load_cooperation(&report.artifacts.cooperation).unwrap();
        assert_eq!(matrix, report.output.cooperation);
    }

    #[test]
    fn test_blocked_destination_leaves_no_partial_artifacts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, RAW).unwrap();
        let out = dir.path().join("out");
        let blocked = out.join(COOPERATION_FILE);
        fs::create_dir_all(blocked.join("inner")).unwrap();

        let err = run(&PipelineOptions::new(&input, &out)).unwrap_err();

        assert!(matches!(err, PipelineError::ArtifactWrite { ref path, .. } if path == &blocked));
        assert!(!out.join(CLEANED_FILE).exists());
        assert!(!out.join(SUMMARY_FILE).exists());
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_failed_write_keeps_previous_artifacts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, RAW).unwrap();
        fs::write(dir.path().join(CLEANED_FILE), "previous\n").unwrap();
        fs::create_dir(dir.path().join(SUMMARY_FILE)).unwrap();

        let err = run(&PipelineOptions::new(&input, dir.path())).unwrap_err();

        assert!(matches!(err, PipelineError::ArtifactWrite { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join(CLEANED_FILE)).unwrap(),
            "previous\n"
        );
        assert!(!dir.path().join(COOPERATION_FILE).exists());
    }

    #[test]
    fn test_reload_keeps_emptied_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, "Startup Name,Mark Cuban Investment Amount,Loan\nAlpha,100,\n,abc,yes\n")
            .unwrap();
        let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();
        assert_eq!(report.output.cleaned.row_count(), 2);

        let cleaned = load_cleaned(&report.artifacts.cleaned).unwrap();
        assert_eq!(cleaned.row_count(), 2);
        assert!(cleaned.cell(1, "Mark Cuban Investitionssumme").unwrap().is_missing());
    }

    #[test]
    fn test_summary_artifact_optional() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, RAW).unwrap();
        let mut options = PipelineOptions::new(&input, dir.path());
        options.artifacts.summary = None;

        run(&options).unwrap();
        assert!(!dir.path().join(SUMMARY_FILE).exists());
        assert!(dir.path().join(CLEANED_FILE).exists());
    }
}
