//! Shared "analytics pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (or load snapshot) -> deltas + trends -> insights
//!
//! The subcommands can then focus on presentation (tables, JSON, CSV).

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::analytics::{Analysis, analyze};
use crate::data::{FetchCaches, FredClient, FxClient, SystemClock, fetch_snapshot};
use crate::domain::{MarketSnapshot, RunConfig};
use crate::error::AppError;

/// Execute the full pipeline: obtain series, then analyze them.
pub fn run_analysis(config: &RunConfig, today: NaiveDate) -> Result<Analysis, AppError> {
    let snapshot = match &config.snapshot_in {
        Some(path) => {
            info!(path = %path.display(), "loading snapshot");
            crate::io::read_snapshot_json(path)?
        }
        None => {
            let fred = FredClient::from_env()?;
            let fx = FxClient::from_env();
            let caches = FetchCaches::new(Arc::new(SystemClock));
            fetch_snapshot(&fred, &fx, &caches, config, today)?
        }
    };

    if let Some(path) = &config.snapshot_out {
        crate::io::write_snapshot_json(path, &snapshot)?;
        info!(path = %path.display(), "saved snapshot");
    }

    run_analysis_with_snapshot(config, snapshot)
}

/// Analyze a pre-fetched snapshot.
///
/// FX pairs outside `config.currencies` are ignored.
pub fn run_analysis_with_snapshot(
    config: &RunConfig,
    mut snapshot: MarketSnapshot,
) -> Result<Analysis, AppError> {
    snapshot.fx.retain(|currency, _| config.currencies.contains(currency));

    let analysis = analyze(&snapshot, config.policy)?;
    info!(
        indicators = analysis.indicators.len(),
        fx_pairs = analysis.fx.len(),
        insights = analysis.insights.len(),
        "analysis complete"
    );

    Ok(analysis)
}
