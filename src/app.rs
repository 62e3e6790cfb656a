//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and cleans the dataset
//! - applies filters and aggregates
//! - prints reports / launches the dashboard
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, ExportArgs, ReportArgs, SampleArgs, ShowArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mi` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mi` and `mi -f data.csv` to behave like `mi dash ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the "just run it" UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Dash(args) => crate::tui::run(args),
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
        Command::Show(args) => handle_show(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let path = resolve_csv_path(args.file)?;
    let data = crate::io::ingest::load_dataset(&path)?;
    let criteria = args.filters.to_criteria()?;
    let view = pipeline::build_view(&data, &criteria, args.top);

    print!(
        "{}",
        crate::report::format_summary(&data, &criteria, view.aggregates.n_records)
    );
    println!();
    print!("{}", crate::report::format_bundle(&view.aggregates));

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let path = resolve_csv_path(args.file)?;
    let data = crate::io::ingest::load_dataset(&path)?;
    let criteria = args.filters.to_criteria()?;
    let view = pipeline::build_view(&data, &criteria, args.top);

    let mut written = crate::io::export::write_series_csvs(&args.out_dir, &view.aggregates)?;

    let bundle_path = args.out_dir.join(crate::io::bundle::BUNDLE_FILE_NAME);
    let dashboard = pipeline::to_dashboard_file(&data, &view);
    crate::io::bundle::write_dashboard_json(&bundle_path, &dashboard)?;
    written.push(bundle_path);

    for file in &written {
        println!("wrote {}", file.display());
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let dashboard = crate::io::bundle::read_dashboard_json(&args.bundle)?;
    print!("{}", crate::report::format_dashboard_file(&dashboard));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = args.to_spec()?;
    let rows = crate::data::sample::write_sample_csv(&args.out, &spec)?;
    println!("wrote {rows} rows to {}", args.out.display());
    Ok(())
}

/// Use the given path when present, otherwise fall back to the picker.
fn resolve_csv_path(file: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match file {
        Some(path) => crate::cli::picker::validate_csv_path(&path),
        None => crate::cli::picker::prompt_for_csv_path(),
    }
}

/// Rewrite argv so `mi` defaults to `mi dash`.
///
/// Rules:
/// - `mi`                      -> `mi dash`
/// - `mi -f data.csv ...`      -> `mi dash -f data.csv ...`
/// - `mi --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dash".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "dash" | "report" | "export" | "show" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "dash flags".
    if arg1.starts_with('-') {
        argv.insert(1, "dash".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_dash() {
        assert_eq!(rewrite_args(args(&["mi"])), args(&["mi", "dash"]));
        assert_eq!(
            rewrite_args(args(&["mi", "-f", "data.csv"])),
            args(&["mi", "dash", "-f", "data.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["mi", "report", "-f", "data.csv"])),
            args(&["mi", "report", "-f", "data.csv"])
        );
        assert_eq!(rewrite_args(args(&["mi", "--help"])), args(&["mi", "--help"]));
        assert_eq!(rewrite_args(args(&["mi", "-V"])), args(&["mi", "-V"]));
    }
}
