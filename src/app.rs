//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - reads and normalizes the source file
//! - runs the dashboard pipeline
//! - prints reports, writes exports, or starts the TUI

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, DashArgs, GenerateArgs};
use crate::data::SynthConfig;
use crate::domain::{RecordSet, Season, SourceSpec, ViewParams};
use crate::error::AppError;
use crate::logging::{LogTarget, init_logging};

pub mod pipeline;

/// Entry point for the `load-dash` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `load-dash` and `load-dash -f x.csv` behave like `load-dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let _guard = init_logging(LogTarget::File(&args.log_dir))?;
    let spec = source_spec_from_args(&args);
    let (records, note) = crate::io::load_record_set(&spec)?;
    let params = view_params_from_args(&args, records.as_ref());
    crate::tui::run(spec, records, params, note)
}

fn handle_report(args: DashArgs) -> Result<(), AppError> {
    let _guard = init_logging(LogTarget::Stderr)?;
    let spec = source_spec_from_args(&args);
    let (records, note) = crate::io::load_record_set(&spec)?;
    if let Some(note) = &note {
        eprintln!("{note}");
    }

    let params = view_params_from_args(&args, records.as_ref());
    let view = pipeline::build_view(records.as_ref(), &params);

    print!("{}", crate::report::format::format_summary(&view, &params, &spec));
    println!("{}", crate::report::format::format_buckets(&view.buckets, &params));
    print!("{}", crate::report::format::format_table(&view.table, args.max_rows));

    if let Some(path) = &args.export_table {
        crate::io::export::write_table_csv(path, &view.table)?;
    }
    if let Some(path) = &args.export_buckets {
        crate::io::export::write_buckets_csv(path, &view.buckets, params.granularity)?;
    }
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let _guard = init_logging(LogTarget::Stderr)?;
    let config = SynthConfig {
        start: args.start,
        days: args.days,
        seed: args.seed,
        base_mw: args.base_mw,
        missing_prob: args.missing_prob,
        ..SynthConfig::default()
    };
    let series = crate::data::generate_series(&config)?;
    crate::data::write_source_csv(&args.out, &series)?;
    println!("Wrote {} hourly rows to {}", series.len(), args.out.display());
    Ok(())
}

pub fn source_spec_from_args(args: &DashArgs) -> SourceSpec {
    SourceSpec {
        path: args.file.clone(),
        timestamp_column: args.timestamp_col.clone(),
        load_column: args.load_col.clone(),
    }
}

/// Build the initial view parameters.
///
/// Unset dates default to the span of the data (or today when there is no data).
pub fn view_params_from_args(args: &DashArgs, records: Option<&RecordSet>) -> ViewParams {
    let today = chrono::Local::now().date_naive();
    let (first, last) = records
        .and_then(RecordSet::date_span)
        .unwrap_or((today, today));

    let mut params = ViewParams::for_span(args.start.unwrap_or(first), args.end.unwrap_or(last));
    if !args.seasons.is_empty() {
        for label in &args.seasons {
            if Season::parse_label(label).is_none() {
                warn!(label = %label, "unknown season label; it will never match");
            }
        }
        params.seasons = args.seasons.clone();
    }
    params.threshold = args.threshold;
    params.show_peaks = args.show_peaks;
    params.granularity = args.granularity;
    params.table_mode = args.table_mode;
    params.rank_size = args.top;
    params.histogram_bins = args.bins;
    info!(start = %params.start, end = %params.end, "initial view parameters");
    params
}

/// Rewrite argv so `load-dash` defaults to `load-dash tui`.
///
/// Rules:
/// - `load-dash`                     -> `load-dash tui`
/// - `load-dash -f x.csv ...`        -> `load-dash tui -f x.csv ...`
/// - `load-dash --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "generate");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
