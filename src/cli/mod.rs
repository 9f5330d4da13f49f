//! Command-line parsing for the macro indicator & FX insight tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Currency;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Macro indicator & FX insight engine (FRED-based)")]
pub struct Cli {
    /// Enable debug logging (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch (or load) data, print the indicator and FX tables and the ideas list.
    Report(RunArgs),
    /// Print the ideas list only (useful for scripting).
    Ideas(RunArgs),
    /// Write current indicators, historical series and FX rates to CSV files.
    Export(ExportArgs),
    /// Print current USD spot rates.
    Rates(RatesArgs),
}

/// Common options for every run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// FRED lookback window (months).
    #[arg(long, default_value_t = 60)]
    pub months: u32,

    /// FX lookback window (months).
    #[arg(long, default_value_t = 14)]
    pub fx_months: u32,

    /// Quote currency to track against USD (repeatable).
    #[arg(long = "currency", value_enum, default_values_t = Currency::ALL.to_vec())]
    pub currencies: Vec<Currency>,

    /// Render short series as placeholders instead of failing the run.
    #[arg(long)]
    pub placeholders: bool,

    /// Load series from a snapshot JSON instead of fetching.
    #[arg(long, value_name = "JSON")]
    pub snapshot: Option<PathBuf>,

    /// Save the fetched series to a snapshot JSON.
    #[arg(long = "save-snapshot", value_name = "JSON")]
    pub save_snapshot: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables (unknown values are `null`).
    #[arg(long)]
    pub json: bool,
}

/// Options for the spot-rate view.
#[derive(Debug, Args, Clone)]
pub struct RatesArgs {
    /// Quote currency to show against USD (repeatable).
    #[arg(long = "currency", value_enum, default_values_t = Currency::ALL.to_vec())]
    pub currencies: Vec<Currency>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Options for CSV export.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Directory for the CSV files.
    #[arg(long = "out-dir", value_name = "DIR", default_value = "exports")]
    pub out_dir: PathBuf,
}
