//! Export indicator and FX data to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Unknown values (`NaN`) are written as empty cells so they never read as zero.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{FxResult, IndicatorResult};
use crate::error::AppError;

/// Paths written by [`write_all`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub current: PathBuf,
    pub historical: PathBuf,
    pub fx: PathBuf,
}

/// Write the current-indicator, historical-series and FX CSVs into `dir`.
///
/// File names carry `run_date` (`indicators_current_<date>.csv`, ...).
pub fn write_all(
    dir: &Path,
    run_date: NaiveDate,
    indicators: &[IndicatorResult],
    fx: &[FxResult],
) -> Result<ExportPaths, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display()))
    })?;

    let paths = ExportPaths {
        current: dir.join(format!("indicators_current_{run_date}.csv")),
        historical: dir.join(format!("indicators_historical_{run_date}.csv")),
        fx: dir.join(format!("fx_rates_{run_date}.csv")),
    };

    write_current_indicators(create(&paths.current)?, indicators)?;
    write_historical_series(create(&paths.historical)?, indicators)?;
    write_fx_series(create(&paths.fx)?, fx)?;

    info!(dir = %dir.display(), "wrote CSV exports");
    Ok(paths)
}

/// One row per indicator: latest, YoY, MoM, trend.
pub fn write_current_indicators<W: Write>(out: W, indicators: &[IndicatorResult]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["indicator", "label", "latest", "yoy", "mom", "trend", "updatedAt", "unit"])
        .map_err(csv_err)?;

    for r in indicators {
        wtr.write_record([
            r.id.key().to_string(),
            r.label.clone(),
            fixed(r.deltas.latest_value(), 2),
            fixed(r.deltas.yoy_value(), 2),
            fixed(r.deltas.mom_value(), 2),
            r.trend.as_str().to_string(),
            r.updated_at.map(|d| d.to_string()).unwrap_or_default(),
            r.unit.as_str().to_string(),
        ])
        .map_err(csv_err)?;
    }
    wtr.flush().map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Every observation of every indicator.
pub fn write_historical_series<W: Write>(out: W, indicators: &[IndicatorResult]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["indicator", "date", "value", "unit"])
        .map_err(csv_err)?;

    for r in indicators {
        for p in r.series.points() {
            wtr.write_record([
                r.id.key().to_string(),
                p.date.to_string(),
                fixed(Some(p.value), 2),
                r.unit.as_str().to_string(),
            ])
            .map_err(csv_err)?;
        }
    }
    wtr.flush().map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

/// Every monthly observation of every FX pair.
pub fn write_fx_series<W: Write>(out: W, fx: &[FxResult]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["pair", "date", "rate"]).map_err(csv_err)?;

    for r in fx {
        let pair = r.currency.pair_label();
        for p in r.series.points() {
            wtr.write_record([pair.clone(), p.date.to_string(), fixed(Some(p.value), 4)])
                .map_err(csv_err)?;
        }
    }
    wtr.flush().map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn csv_err(e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write export CSV row: {e}"))
}

/// Unknown values become empty cells.
fn fixed(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| format!("{v:.decimals$}")).unwrap_or_default()
}
