//! Shark Tank CLI - clean pitch exports and derive investor views
//!
//! # Main Commands
//!
//! ```bash
//! sharktank run                         # Full pipeline, writes the three artifacts
//! sharktank serve                       # Start HTTP server (port 3000)
//! sharktank report --season 1 --deal 1  # Report dataset from the artifacts
//! ```
//!
//! # Inspection Commands
//!
//! ```bash
//! sharktank summary raw.csv             # Investor totals as JSON
//! sharktank cooperation raw.csv         # Pairwise co-investment counts as CSV
//! sharktank describe cleaned.csv        # Statistics of numeric columns
//! sharktank columns                     # Dropped columns and rename mapping
//! ```
//!
//! Defaults come from the environment (see [`sharktank::config`]); flags win.

use clap::{Parser, Subcommand};
use sharktank::{
    build_cooperation_matrix, build_report, clean_table, describe, load_cleaned,
    load_cooperation, parse_file_auto, run, start_server, summarize_investors, write_records,
    Config, ReportFilter, Table, COLUMN_RENAMES, COOPERATION_HEADERS, DROPPED_COLUMNS,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sharktank")]
#[command(about = "Clean Shark Tank pitch data and derive investor summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: raw CSV → cleaned table, cooperation matrix, investor summary
    Run {
        /// Raw export (default: SHARKTANK_INPUT)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Artifact directory (default: SHARKTANK_OUTPUT_DIR)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Skip the investor summary artifact
        #[arg(long)]
        no_summary: bool,
    },

    /// Print the investor summary as JSON
    Summary {
        /// Input CSV file
        input: PathBuf,

        /// Input is an already-cleaned table
        #[arg(long)]
        cleaned: bool,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Print or write the shark cooperation matrix
    Cooperation {
        /// Input CSV file
        input: PathBuf,

        /// Input is an already-cleaned table
        #[arg(long)]
        cleaned: bool,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report dataset computed from the artifacts
    Report {
        /// Artifact directory (default: SHARKTANK_OUTPUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Seasons to keep (repeatable)
        #[arg(long)]
        season: Vec<String>,

        /// Industries to keep (repeatable)
        #[arg(long)]
        industry: Vec<String>,

        /// Pitcher genders to keep (repeatable)
        #[arg(long)]
        gender: Vec<String>,

        /// Deal outcomes to keep: 1, 0, Deal or No-Deal (repeatable)
        #[arg(long)]
        deal: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Descriptive statistics of every numeric column of a cleaned table
    Describe {
        /// Cleaned CSV file
        input: PathBuf,
    },

    /// Show dropped source columns and the rename mapping
    Columns,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: SHARKTANK_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };
    config.logging.init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            out_dir,
            delimiter,
            no_summary,
        } => cmd_run(config, input, out_dir, delimiter, no_summary),

        Commands::Summary {
            input,
            cleaned,
            delimiter,
        } => cmd_summary(&input, cleaned, delimiter),

        Commands::Cooperation {
            input,
            cleaned,
            delimiter,
            output,
        } => cmd_cooperation(&input, cleaned, delimiter, output.as_deref()),

        Commands::Report {
            out_dir,
            season,
            industry,
            gender,
            deal,
            output,
        } => {
            let filter = ReportFilter {
                seasons: selection(season),
                industries: selection(industry),
                genders: selection(gender),
                deals: selection(deal),
            };
            cmd_report(config, out_dir, &filter, output.as_deref())
        }

        Commands::Describe { input } => cmd_describe(&input),

        Commands::Columns => cmd_columns(),

        Commands::Serve { port } => cmd_serve(config, port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_run(
    mut config: Config,
    input: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    delimiter: Option<char>,
    no_summary: bool,
) -> CmdResult {
    if let Some(input) = input {
        config.input = input;
    }
    if let Some(dir) = out_dir {
        config.output_dir = dir;
    }
    if delimiter.is_some() {
        config.delimiter = delimiter;
    }

    let mut options = config.pipeline_options();
    if no_summary {
        options.artifacts.summary = None;
    }

    let report = run(&options)?;

    eprintln!("\n📊 Run {} finished at {}", report.run_id, report.finished_at);
    eprintln!("   Rows:              {}", report.output.cleaned.row_count());
    eprintln!("   Columns:           {}", report.output.cleaned.headers().len());
    eprintln!("   Cooperating pairs: {}", report.output.cooperation.len());
    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_summary(input: &Path, cleaned: bool, delimiter: Option<char>) -> CmdResult {
    let table = load_table(input, cleaned, delimiter)?;
    let summary = summarize_investors(&table);
    write_output(&serde_json::to_string_pretty(&summary)?, None)
}

fn cmd_cooperation(
    input: &Path,
    cleaned: bool,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> CmdResult {
    let table = load_table(input, cleaned, delimiter)?;
    let matrix = build_cooperation_matrix(&table);
    eprintln!("🤝 {} pairs, {} co-investments", matrix.len(), matrix.total());

    let mut buf = Vec::new();
    write_records(&COOPERATION_HEADERS, &matrix.rows(), &mut buf)?;
    write_output(&String::from_utf8(buf)?, output)
}

fn cmd_report(
    mut config: Config,
    out_dir: Option<PathBuf>,
    filter: &ReportFilter,
    output: Option<&Path>,
) -> CmdResult {
    if let Some(dir) = out_dir {
        config.output_dir = dir;
    }
    let artifacts = config.artifacts();

    let cleaned = load_cleaned(&artifacts.cleaned)?;
    let matrix = load_cooperation(&artifacts.cooperation)?;
    let report = build_report(&cleaned, &matrix, filter);
    eprintln!("📋 {} of {} rows selected", report.row_count, cleaned.row_count());

    write_output(&serde_json::to_string_pretty(&report)?, output)
}

fn cmd_describe(input: &Path) -> CmdResult {
    let table = load_cleaned(input)?;
    let stats = describe(&table);
    write_output(&serde_json::to_string_pretty(&stats)?, None)
}

fn cmd_columns() -> CmdResult {
    println!("Dropped columns:");
    for name in DROPPED_COLUMNS {
        println!("  - {}", name);
    }
    println!("\nRenamed columns:");
    for (from, to) in COLUMN_RENAMES {
        println!("  {:<36} → {}", from, to);
    }
    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> CmdResult {
    let port = port.unwrap_or(config.port);
    eprintln!("🚀 Sharktank server running on http://localhost:{}", port);
    eprintln!("   POST /api/upload          - Run the pipeline on a CSV");
    eprintln!("   GET  /api/summary         - Investor summary");
    eprintln!("   GET  /api/cooperation     - Cooperation matrix");
    eprintln!("   GET  /api/report          - Report dataset");
    eprintln!("   GET  /api/startups/{{name}} - Startup lookup");
    eprintln!("   GET  /api/logs            - SSE log stream");
    eprintln!("   GET  /health              - Health check");

    start_server(port, config.artifacts()).await?;
    Ok(())
}

/// Raw input runs the cleaning stages; a cleaned table is only re-coerced.
fn load_table(input: &Path, cleaned: bool, delimiter: Option<char>) -> Result<Table, Box<dyn std::error::Error>> {
    if cleaned {
        return Ok(load_cleaned(input)?);
    }
    let parsed = parse_file_auto(input, delimiter)?;
    Ok(clean_table(parsed.table))
}

fn selection(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

fn write_output(content: &str, path: Option<&Path>) -> CmdResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", content)?;
        }
    }
    Ok(())
}
