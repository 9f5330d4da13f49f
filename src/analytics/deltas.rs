//! Latest / month-over-month / year-over-year derivation.
//!
//! Monthly series are assumed, so "one year ago" is the observation 12
//! positions before the latest one. Undefined changes are `NaN`, never `0.0`.

use crate::domain::{DeltaResult, Series};
use crate::math::pct_change;

/// Minimum points for a month-over-month change.
pub const MOM_MIN_POINTS: usize = 2;

/// Minimum points for a year-over-year change (latest plus 12 months back).
pub const YOY_MIN_POINTS: usize = 13;

/// Compute latest value, MoM and YoY percentage changes for a series.
///
/// Each field is derived independently: a two-point series has a known MoM
/// and an unknown YoY.
pub fn compute_deltas(series: &Series) -> DeltaResult {
    let Some(latest) = series.value_back(1) else {
        return DeltaResult::UNKNOWN;
    };

    DeltaResult {
        latest,
        mom: change_back(series, latest, MOM_MIN_POINTS),
        yoy: change_back(series, latest, YOY_MIN_POINTS),
    }
}

fn change_back(series: &Series, latest: f64, k: usize) -> f64 {
    series
        .value_back(k)
        .and_then(|anchor| pct_change(latest, anchor))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_series;

    #[test]
    fn yoy_over_thirteen_linear_points() {
        // 100 -> 110 over 13 monthly points.
        let values: Vec<f64> = (0..13).map(|i| 100.0 + i as f64 * 10.0 / 12.0).collect();
        let deltas = compute_deltas(&test_series(&values));
        assert!((deltas.yoy - 10.0).abs() < 0.1, "yoy={}", deltas.yoy);
        assert!(deltas.mom.is_finite());
        assert!((deltas.latest - 110.0).abs() < 1e-9);
    }

    #[test]
    fn two_points_give_mom_only() {
        let deltas = compute_deltas(&test_series(&[100.0, 105.0]));
        assert!((deltas.mom - 5.0).abs() < 1e-9);
        assert!(deltas.yoy.is_nan());
        assert_eq!(deltas.latest, 105.0);
    }

    #[test]
    fn single_point_has_latest_only() {
        let deltas = compute_deltas(&test_series(&[100.0]));
        assert_eq!(deltas.latest, 100.0);
        assert!(deltas.mom.is_nan());
        assert!(deltas.yoy.is_nan());
    }

    #[test]
    fn empty_series_is_all_unknown() {
        let deltas = compute_deltas(&Series::default());
        assert!(deltas.latest.is_nan() && deltas.mom.is_nan() && deltas.yoy.is_nan());
    }

    #[test]
    fn zero_anchor_is_unknown_not_zero() {
        let mut values = vec![0.0];
        values.extend(std::iter::repeat_n(1.0, 11));
        values.push(0.0);
        values.push(2.0);
        // Prior month is 0 -> MoM unknown; 12 back is 1 -> YoY +100%.
        let deltas = compute_deltas(&test_series(&values));
        assert!(deltas.mom.is_nan());
        assert!((deltas.yoy - 100.0).abs() < 1e-9);

        let mut values = vec![0.0];
        values.extend(std::iter::repeat_n(1.0, 12));
        let deltas = compute_deltas(&test_series(&values));
        assert!(deltas.yoy.is_nan());
        assert_eq!(deltas.mom, 0.0);
    }

    #[test]
    fn constant_series_has_zero_changes() {
        let deltas = compute_deltas(&test_series(&[42.0; 24]));
        assert_eq!(deltas.mom, 0.0);
        assert_eq!(deltas.yoy, 0.0);
    }

    #[test]
    fn strictly_increasing_series_is_finite() {
        let values: Vec<f64> = (1..=30).map(|i| i as f64 * 1.5).collect();
        let deltas = compute_deltas(&test_series(&values));
        assert!(deltas.mom.is_finite() && deltas.yoy.is_finite());
        assert!(deltas.mom > 0.0 && deltas.yoy > deltas.mom);
    }
}
