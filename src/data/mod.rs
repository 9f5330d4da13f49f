//! Upstream data: FRED indicators, FX rates, and the response cache.
//!
//! Everything here is I/O. It hands fully materialized, sorted series to the
//! analytics core and never computes deltas itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use tracing::info;

pub mod cache;
pub mod fred;
pub mod fx;

pub use cache::{Clock, FRED_TTL, FX_TTL, ResponseCache, SystemClock};
pub use fred::FredClient;
pub use fx::{FxClient, FxSeriesMap, SpotRates};

use crate::domain::{IndicatorId, MarketSnapshot, ObservationPoint, RunConfig, Series};
use crate::error::AppError;

/// Response caches shared by the fetch calls.
///
/// Every key is requested once per one-shot CLI run, so hits only happen when
/// a caller keeps the same `FetchCaches` across several fetches.
pub struct FetchCaches {
    pub fred: ResponseCache<Series>,
    pub fx: ResponseCache<FxSeriesMap>,
    pub fx_latest: ResponseCache<SpotRates>,
}

impl FetchCaches {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            fred: ResponseCache::new(FRED_TTL, clock.clone()),
            fx: ResponseCache::new(FX_TTL, clock.clone()),
            fx_latest: ResponseCache::new(FX_TTL, clock),
        }
    }
}

/// Fetch every tracked indicator and the configured FX pairs.
///
/// Requests run in parallel; any failure fails the whole snapshot.
pub fn fetch_snapshot(
    fred: &FredClient,
    fx: &FxClient,
    caches: &FetchCaches,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<MarketSnapshot, AppError> {
    let (indicators, fx_series) = rayon::join(
        || {
            IndicatorId::ALL
                .par_iter()
                .map(|&id| {
                    fred.fetch_indicator(id, config.months, today, &caches.fred)
                        .map(|series| (id, series))
                })
                .collect::<Result<BTreeMap<_, _>, AppError>>()
        },
        || fx.fetch_monthly(&config.currencies, config.fx_months, today, &caches.fx),
    );

    let snapshot = MarketSnapshot {
        indicators: indicators?,
        fx: fx_series?,
    };
    info!(
        indicators = snapshot.indicators.len(),
        fx_pairs = snapshot.fx.len(),
        "market snapshot ready"
    );
    Ok(snapshot)
}

/// Keep the last observation of each calendar month.
pub fn month_end(series: &Series) -> Series {
    let mut out: Vec<ObservationPoint> = Vec::new();
    for p in series.points() {
        match out.last_mut() {
            Some(prev) if (prev.date.year(), prev.date.month()) == (p.date.year(), p.date.month()) => {
                *prev = *p
            }
            _ => out.push(*p),
        }
    }
    Series::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_end_keeps_last_point_per_month() {
        let daily = Series::from_observations(vec![
            (d(2024, 1, 2), 1.0),
            (d(2024, 1, 31), 2.0),
            (d(2024, 2, 1), 3.0),
            (d(2024, 2, 29), 4.0),
            (d(2024, 3, 15), 5.0),
        ]);
        let monthly = month_end(&daily);
        assert_eq!(monthly.values(), vec![2.0, 4.0, 5.0]);
        assert_eq!(monthly.points()[1].date, d(2024, 2, 29));
    }

    #[test]
    fn month_end_leaves_monthly_series_alone() {
        let monthly = Series::from_observations(vec![
            (d(2024, 1, 1), 308.4),
            (d(2024, 2, 1), 309.7),
            (d(2025, 1, 1), 317.6),
        ]);
        assert_eq!(month_end(&monthly), monthly);
    }
}
