//! Indicator analytics: the pure computation core.
//!
//! Responsibilities:
//!
//! - derive latest / MoM / YoY from an ordered series (`deltas`)
//! - classify the latest move against recent volatility (`trend`)
//! - compose per-slot results and feed the insight rules (`facade`)
//!
//! Nothing in here performs I/O; every function is a deterministic function
//! of its inputs and safe to call from parallel workers.

pub mod deltas;
pub mod error;
pub mod facade;
pub mod trend;

pub use deltas::*;
pub use error::AnalyticsError;
pub use facade::*;
pub use trend::*;

/// Monthly series starting Jan 2020 with the given values (tests only).
#[cfg(test)]
pub(crate) fn test_series(values: &[f64]) -> crate::domain::Series {
    use chrono::{Months, NaiveDate};

    use crate::domain::{ObservationPoint, Series};

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    Series::new(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ObservationPoint::new(start + Months::new(i as u32), v))
            .collect(),
    )
}
