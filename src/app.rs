//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - fetches (or loads) the indicator and FX series
//! - runs the analytics + insight rules
//! - prints reports, spot rates or writes CSV exports

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Command, ExportArgs, RatesArgs, RunArgs};
use crate::data::{FetchCaches, FxClient, SystemClock};
use crate::domain::{InsufficientDataPolicy, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // `pulse` alone behaves like `pulse report`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Ideas(args) => handle_report(args, OutputMode::IdeasOnly),
        Command::Export(args) => handle_export(args),
        Command::Rates(args) => handle_rates(args),
    }
}

/// Priority: `RUST_LOG` > `--verbose` > info. Logs go to stderr.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // A second init (tests, embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    IdeasOnly,
}

fn handle_report(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let today = chrono::Local::now().date_naive();
    let analysis = pipeline::run_analysis(&config, today)?;

    if args.json {
        let json = match mode {
            OutputMode::Full => serde_json::to_string_pretty(&analysis),
            OutputMode::IdeasOnly => serde_json::to_string_pretty(&analysis.insights),
        }
        .map_err(json_err)?;
        println!("{json}");
        return Ok(());
    }

    match mode {
        OutputMode::Full => println!("{}", crate::report::format_report(&analysis, today)),
        OutputMode::IdeasOnly => {
            println!("{}", crate::report::format_insights(&analysis.insights))
        }
    }
    Ok(())
}

fn handle_rates(args: RatesArgs) -> Result<(), AppError> {
    let fx = FxClient::from_env();
    let caches = FetchCaches::new(Arc::new(SystemClock));
    let rates = fx.fetch_latest(&args.currencies, &caches.fx_latest)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rates).map_err(json_err)?);
    } else {
        println!("{}", crate::report::format_spot_rates(&rates));
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.run);
    let today = chrono::Local::now().date_naive();
    let analysis = pipeline::run_analysis(&config, today)?;

    let paths = crate::io::write_all(&args.out_dir, today, &analysis.indicators, &analysis.fx)?;
    println!("{}", paths.current.display());
    println!("{}", paths.historical.display());
    println!("{}", paths.fx.display());
    Ok(())
}

fn json_err(e: serde_json::Error) -> AppError {
    AppError::new(4, format!("Failed to serialize output JSON: {e}"))
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    let mut currencies = args.currencies.clone();
    currencies.sort();
    currencies.dedup();

    RunConfig {
        months: args.months,
        fx_months: args.fx_months,
        currencies,
        policy: if args.placeholders {
            InsufficientDataPolicy::Placeholder
        } else {
            InsufficientDataPolicy::Fail
        },
        snapshot_in: args.snapshot.clone(),
        snapshot_out: args.save_snapshot.clone(),
    }
}

/// Rewrite argv so `pulse` defaults to `pulse report`.
///
/// Rules:
/// - `pulse`                        -> `pulse report`
/// - `pulse --months 24 ...`        -> `pulse report --months 24 ...`
/// - `pulse --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("report".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "ideas" | "export" | "rates");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_report() {
        assert_eq!(rewrite_args(argv(&["pulse"])), argv(&["pulse", "report"]));
        assert_eq!(
            rewrite_args(argv(&["pulse", "--months", "24"])),
            argv(&["pulse", "report", "--months", "24"])
        );
        assert_eq!(rewrite_args(argv(&["pulse", "--help"])), argv(&["pulse", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["pulse", "ideas"])),
            argv(&["pulse", "ideas"])
        );
        assert_eq!(
            rewrite_args(argv(&["pulse", "rates", "--json"])),
            argv(&["pulse", "rates", "--json"])
        );
    }

    #[test]
    fn config_from_args() {
        let cli = crate::cli::Cli::parse_from([
            "pulse",
            "report",
            "--currency",
            "eur",
            "--currency",
            "ngn",
            "--currency",
            "eur",
            "--placeholders",
            "--months",
            "24",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.months, 24);
        assert_eq!(config.currencies, vec![crate::domain::Currency::Ngn, crate::domain::Currency::Eur]);
        assert_eq!(config.policy, InsufficientDataPolicy::Placeholder);
        assert!(config.snapshot_in.is_none());
    }
}
