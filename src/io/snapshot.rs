//! Read/write market snapshot JSON files.
//!
//! A snapshot is the raw input of a run (every fetched series), so a run can
//! be replayed offline with `--snapshot`. Computed results are never stored.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::MarketSnapshot;
use crate::error::AppError;

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &MarketSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a snapshot JSON file.
///
/// Series are re-normalized on load, so hand-edited files still honor the
/// ordering contract.
pub fn read_snapshot_json(path: &Path) -> Result<MarketSnapshot, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open snapshot JSON '{}': {e}", path.display())))?;
    let raw: MarketSnapshot =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid snapshot JSON: {e}")))?;

    let normalize = |s: crate::domain::Series| {
        crate::domain::Series::from_observations(s.points().iter().map(|p| (p.date, p.value)))
    };
    Ok(MarketSnapshot {
        indicators: raw.indicators.into_iter().map(|(k, s)| (k, normalize(s))).collect(),
        fx: raw.fx.into_iter().map(|(k, s)| (k, normalize(s))).collect(),
    })
}
