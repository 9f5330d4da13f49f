//! FRED API integration for the tracked economic indicators.
//!
//! DGS10 and DGS3MO are daily on FRED and MORTGAGE30US is weekly. Every series
//! is requested at monthly frequency (end of period) and folded to month-end
//! again after parsing, so MoM/YoY always compare months.

use chrono::{Months, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::data::cache::ResponseCache;
use crate::data::month_end;
use crate::domain::{IndicatorId, Series};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        let base_url = std::env::var("PULSE_FRED_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Ok(Self::new(api_key, base_url))
    }

    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Fetch an indicator's observations for the last `months` (+1) months.
    pub fn fetch_indicator(
        &self,
        id: IndicatorId,
        months: u32,
        today: NaiveDate,
        cache: &ResponseCache<Series>,
    ) -> Result<Series, AppError> {
        let key = format!("fred:{}:{months}", id.series_id());
        cache.get_or_try_insert(&key, || {
            let (start, end) = observation_window(today, months)?;
            self.fetch_series(id.series_id(), start, end)
        })
    }

    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Series, AppError> {
        debug!(series_id, %start, %end, "requesting FRED series");
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("frequency", "m"),
                ("aggregation_method", "eop"),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("FRED request for {series_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FRED request for {series_id} failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response for {series_id}: {e}")))?;

        let series = parse_observations(body)?;
        info!(series_id, points = series.len(), "fetched FRED series");
        Ok(series)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// `[today - (months + 1) months, today]`.
fn observation_window(today: NaiveDate, months: u32) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = today
        .checked_sub_months(Months::new(months.saturating_add(1)))
        .ok_or_else(|| AppError::new(2, format!("Lookback of {months} months is out of range.")))?;
    Ok((start, today))
}

fn parse_observations(body: ObservationsResponse) -> Result<Series, AppError> {
    let mut raw = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid FRED date '{}': {e}", obs.date)))?;
        raw.push((date, value));
    }
    Ok(month_end(&Series::from_observations(raw)))
}

/// FRED marks missing observations with `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_skips_missing_markers() {
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value(" 4.33 "), Some(4.33));
    }

    #[test]
    fn parses_observations_body() {
        let body: ObservationsResponse = serde_json::from_str(
            r#"{
                "realtime_start": "2025-01-01",
                "observations": [
                    {"realtime_start": "2025-01-01", "date": "2024-11-01", "value": "4.42"},
                    {"realtime_start": "2025-01-01", "date": "2024-12-01", "value": "."},
                    {"realtime_start": "2025-01-01", "date": "2024-10-01", "value": "4.51"}
                ]
            }"#,
        )
        .unwrap();
        let series = parse_observations(body).unwrap();
        assert_eq!(series.values(), vec![4.51, 4.42]);
        assert_eq!(
            series.last().map(|p| p.date),
            NaiveDate::from_ymd_opt(2024, 11, 1)
        );
    }

    #[test]
    fn daily_observations_collapse_to_one_point_per_month() {
        let mut rows = Vec::new();
        for (month, last_day) in [(1, 31), (2, 28), (3, 17)] {
            for day in 1..=last_day {
                let value = 4.0 + month as f64 / 10.0 + day as f64 / 1000.0;
                rows.push(format!(
                    r#"{{"date": "2025-{month:02}-{day:02}", "value": "{value}"}}"#
                ));
            }
        }
        let body: ObservationsResponse =
            serde_json::from_str(&format!(r#"{{"observations": [{}]}}"#, rows.join(","))).unwrap();

        let series = parse_observations(body).unwrap();
        assert_eq!(series.len(), 3);
        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
            ]
        );
        // MoM compares the month-end values, not consecutive days.
        let deltas = crate::analytics::compute_deltas(&series);
        let expected = (4.317 / 4.228 - 1.0) * 100.0;
        assert!((deltas.mom - expected).abs() < 1e-9);
        assert!(deltas.yoy.is_nan());
    }

    #[test]
    fn rejects_bad_dates() {
        let body = ObservationsResponse {
            observations: vec![Observation {
                date: "11/2024".to_string(),
                value: "1.0".to_string(),
            }],
        };
        let err = parse_observations(body).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn window_reaches_one_month_past_lookback() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let (start, end) = observation_window(today, 60).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2020, 2, 15).unwrap());
        assert_eq!(end, today);
    }
}
