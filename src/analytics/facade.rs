//! Composition of deltas, trends and insights for one run.
//!
//! Shared by the CLI report, the ideas-only view and the CSV export so they
//! all see the same numbers.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::analytics::deltas::{YOY_MIN_POINTS, compute_deltas};
use crate::analytics::error::AnalyticsError;
use crate::analytics::trend::classify_trend;
use crate::domain::{
    Currency, FxResult, IndicatorId, IndicatorResult, Insight, InsufficientDataPolicy,
    MarketSnapshot, Series,
};
use crate::insights::{MarketSlots, evaluate};

/// All computed outputs of a single analytics run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub indicators: Vec<IndicatorResult>,
    pub fx: Vec<FxResult>,
    pub insights: Vec<Insight>,
}

impl Analysis {
    /// Most recent observation date across all indicators.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.indicators.iter().filter_map(|r| r.updated_at).max()
    }
}

/// Derive the full result for one indicator.
pub fn analyze_indicator(
    id: IndicatorId,
    series: Series,
    policy: InsufficientDataPolicy,
) -> Result<IndicatorResult, AnalyticsError> {
    check_length(id.key(), &series, policy)?;

    let deltas = compute_deltas(&series);
    let unit = id.unit();
    let trend = classify_trend(&series, deltas.mom, unit);
    debug!(
        indicator = id.key(),
        points = series.len(),
        latest = deltas.latest,
        mom = deltas.mom,
        yoy = deltas.yoy,
        trend = trend.as_str(),
        "indicator analyzed"
    );

    Ok(IndicatorResult {
        id,
        label: id.label().to_string(),
        unit,
        deltas,
        trend,
        updated_at: series.last().map(|p| p.date),
        series,
    })
}

/// Derive deltas for one USD-based FX pair.
pub fn analyze_fx(
    currency: Currency,
    series: Series,
    policy: InsufficientDataPolicy,
) -> Result<FxResult, AnalyticsError> {
    check_length(&currency.pair_key(), &series, policy)?;

    let deltas = compute_deltas(&series);
    debug!(
        pair = %currency.pair_key(),
        points = series.len(),
        mom = deltas.mom,
        "fx pair analyzed"
    );

    Ok(FxResult {
        currency,
        deltas,
        series,
    })
}

/// Analyze every series in the snapshot and evaluate the insight rules.
///
/// The same `policy` governs indicators and FX pairs alike.
pub fn analyze(
    snapshot: &MarketSnapshot,
    policy: InsufficientDataPolicy,
) -> Result<Analysis, AnalyticsError> {
    let indicators = snapshot
        .indicators
        .par_iter()
        .map(|(id, series)| analyze_indicator(*id, series.clone(), policy))
        .collect::<Result<Vec<_>, _>>()?;

    let fx = snapshot
        .fx
        .par_iter()
        .map(|(currency, series)| analyze_fx(*currency, series.clone(), policy))
        .collect::<Result<Vec<_>, _>>()?;

    let slots = MarketSlots::from_results(&indicators, &fx);
    let insights = evaluate(&slots);
    debug!(count = insights.len(), "insights evaluated");

    Ok(Analysis {
        indicators,
        fx,
        insights,
    })
}

fn check_length(
    slot: &str,
    series: &Series,
    policy: InsufficientDataPolicy,
) -> Result<(), AnalyticsError> {
    if policy == InsufficientDataPolicy::Fail && series.len() < YOY_MIN_POINTS {
        return Err(AnalyticsError::InsufficientData {
            slot: slot.to_string(),
            points: series.len(),
            required: YOY_MIN_POINTS,
        });
    }
    Ok(())
}
