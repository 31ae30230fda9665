//! Command-line parsing for the load dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_HISTOGRAM_BINS, DEFAULT_RANK_SIZE, Granularity, TableMode};

/// Default input file when neither `--file` nor `LOAD_DASH_CSV` is given.
pub const DEFAULT_CSV: &str = "PJM_Load_hourly.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "load-dash", version, about = "Hourly electrical load dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(DashArgs),
    /// Print metric tiles, energy per period and the data table, then exit.
    Report(DashArgs),
    /// Write a synthetic hourly load CSV in the source layout.
    Generate(GenerateArgs),
}

/// Input file and initial dashboard parameters.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Hourly load CSV.
    #[arg(short = 'f', long, env = "LOAD_DASH_CSV", default_value = DEFAULT_CSV)]
    pub file: PathBuf,

    /// Name of the timestamp column (case-insensitive).
    #[arg(long, default_value = "Datetime")]
    pub timestamp_col: String,

    /// Name of the load column, in MW (case-insensitive).
    #[arg(long, default_value = "PJM_Load_MW")]
    pub load_col: String,

    /// First day of the selection (YYYY-MM-DD). Defaults to the first day in the file.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the selection (YYYY-MM-DD). Defaults to the last day in the file.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Season to include (Hiver, Printemps, Eté, Automne). Repeatable; default all.
    #[arg(short = 's', long = "season")]
    pub seasons: Vec<String>,

    /// Peak threshold in MW (must be > 0 to select anything).
    #[arg(short = 't', long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Show hours at or above the threshold.
    #[arg(long)]
    pub show_peaks: bool,

    /// Energy rollup period.
    #[arg(short = 'g', long, value_enum, default_value_t = Granularity::Day)]
    pub granularity: Granularity,

    /// Rows shown in the data table.
    #[arg(long = "table", value_enum, default_value_t = TableMode::All)]
    pub table_mode: TableMode,

    /// Row count for `--table top|bottom`.
    #[arg(long, default_value_t = DEFAULT_RANK_SIZE)]
    pub top: usize,

    /// Histogram bins for the load distribution.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Maximum table rows printed by `report`.
    #[arg(long, default_value_t = 50)]
    pub max_rows: usize,

    /// Export the table rows to CSV.
    #[arg(long)]
    pub export_table: Option<PathBuf>,

    /// Export the energy buckets to CSV.
    #[arg(long)]
    pub export_buckets: Option<PathBuf>,

    /// Directory for TUI log files.
    #[arg(long, env = "LOAD_DASH_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Options for the synthetic series.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, default_value = DEFAULT_CSV)]
    pub out: PathBuf,

    /// First day of the series (YYYY-MM-DD).
    #[arg(long, default_value = "1998-04-01")]
    pub start: NaiveDate,

    /// Number of days to generate.
    #[arg(long, default_value_t = 1461)]
    pub days: u32,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Average load level (MW).
    #[arg(long, default_value_t = 29_000.0)]
    pub base_mw: f64,

    /// Probability that an hourly reading is left empty.
    #[arg(long, default_value_t = 0.0)]
    pub missing_prob: f64,
}
