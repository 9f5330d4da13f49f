//! Small descriptive statistics used by the analytics core.
//!
//! Everything here is a plain function over `f64` slices so the delta and trend
//! code can stay free of bookkeeping.

/// Percentage change from `prev` to `curr` on a 0-100 scale.
///
/// Returns `None` when `prev` is zero or either value is not finite: a zero
/// anchor has no meaningful relative change.
pub fn pct_change(curr: f64, prev: f64) -> Option<f64> {
    if !(curr.is_finite() && prev.is_finite()) || prev == 0.0 {
        return None;
    }
    Some((curr / prev - 1.0) * 100.0)
}

/// Consecutive percentage changes, skipping steps with a zero denominator.
pub fn step_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| pct_change(w[1], w[0]))
        .collect()
}

/// Arithmetic mean (`None` for an empty slice).
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
///
/// An empty slice has zero dispersion.
pub fn population_std_dev(values: &[f64]) -> f64 {
    let Some(m) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_std_dev_divides_by_n() {
        let std = population_std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((std - 2.0_f64.sqrt()).abs() < 1e-12, "got {std}");
        assert!((std - 1.414).abs() < 0.001);
    }

    #[test]
    fn population_std_dev_of_nothing_is_zero() {
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[7.0]), 0.0);
    }

    #[test]
    fn pct_change_rejects_zero_anchor() {
        assert_eq!(pct_change(5.0, 0.0), None);
        assert_eq!(pct_change(f64::NAN, 1.0), None);
        let up = pct_change(105.0, 100.0).unwrap();
        assert!((up - 5.0).abs() < 1e-9);
    }

    #[test]
    fn step_changes_drop_zero_denominators() {
        let changes = step_changes(&[0.0, 1.0, 2.0, 0.0, 3.0]);
        // 0->1 and 0->3 are dropped; 1->2 is +100%, 2->0 is -100%.
        assert_eq!(changes.len(), 2);
        assert!((changes[0] - 100.0).abs() < 1e-9);
        assert!((changes[1] + 100.0).abs() < 1e-9);
    }
}
