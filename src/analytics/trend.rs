//! Volatility-relative trend classification.
//!
//! A move is first compared against a fixed per-unit stability band, then
//! against the series' own recent noise:
//!
//! 1. `|mom| <= band(unit)` -> `Stable`
//! 2. `|mom| > 1.25 * vol` with `vol > 0` -> `VolatileUp` / `VolatileDown`
//! 3. otherwise `Rising` / `Falling`
//!
//! A window with zero volatility skips step 2: an outsized-move test needs
//! some noise to measure against.

use crate::domain::{Series, Trend, Unit, VOLATILITY_MULTIPLIER};
use crate::math::{population_std_dev, step_changes};

/// Number of trailing points in the volatility window (six monthly changes).
pub const VOLATILITY_WINDOW: usize = 7;

/// Population std dev of the step changes over the last seven points.
///
/// Steps with a zero denominator are dropped; no usable steps means `0.0`.
pub fn recent_volatility(series: &Series) -> f64 {
    let values = series.values();
    let start = values.len().saturating_sub(VOLATILITY_WINDOW);
    population_std_dev(&step_changes(&values[start..]))
}

/// Classify the latest move of a series.
///
/// A non-finite `mom` is reported as `Stable`; callers that care must check
/// the delta itself to tell "unknown" from "flat".
pub fn classify_trend(series: &Series, mom: f64, unit: Unit) -> Trend {
    if !mom.is_finite() {
        return Trend::Stable;
    }
    if mom.abs() <= unit.stable_band() {
        return Trend::Stable;
    }

    let vol = recent_volatility(series);
    if vol > 0.0 && mom.abs() > VOLATILITY_MULTIPLIER * vol {
        return if mom > 0.0 {
            Trend::VolatileUp
        } else {
            Trend::VolatileDown
        };
    }

    if mom > 0.0 { Trend::Rising } else { Trend::Falling }
}
