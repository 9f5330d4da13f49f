//! USD-based FX rates (exchangerate.host).
//!
//! - `/timeseries` is daily. We collapse it to one observation per calendar
//!   month (the last trading day) so MoM/YoY keep their monthly meaning.
//! - `/latest` gives the current spot rate per pair.

use std::collections::{BTreeMap, HashMap};

use chrono::{Months, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::data::cache::ResponseCache;
use crate::data::month_end;
use crate::domain::{Currency, Series};
use crate::error::AppError;

const BASE_URL: &str = "https://api.exchangerate.host";
const BASE_CURRENCY: &str = "USD";

/// Monthly FX series per quote currency.
pub type FxSeriesMap = BTreeMap<Currency, Series>;

/// Current USD/<code> spot rate per quote currency.
pub type SpotRates = BTreeMap<Currency, f64>;

pub struct FxClient {
    client: Client,
    base_url: String,
    access_key: Option<String>,
}

impl FxClient {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("PULSE_FX_URL").unwrap_or_else(|_| BASE_URL.to_string());
        let access_key = std::env::var("EXCHANGERATE_API_KEY").ok();
        Self::new(base_url, access_key)
    }

    pub fn new(base_url: impl Into<String>, access_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_key,
        }
    }

    /// Fetch month-end USD/<code> rates for the last `months` months.
    pub fn fetch_monthly(
        &self,
        currencies: &[Currency],
        months: u32,
        today: NaiveDate,
        cache: &ResponseCache<FxSeriesMap>,
    ) -> Result<FxSeriesMap, AppError> {
        if currencies.is_empty() {
            return Ok(FxSeriesMap::new());
        }
        let symbols: Vec<&str> = currencies.iter().map(|c| c.code()).collect();
        let symbols = symbols.join(",");
        let key = format!("fx:{BASE_CURRENCY}:{symbols}:{months}");

        cache.get_or_try_insert(&key, || {
            let start = today
                .checked_sub_months(Months::new(months))
                .ok_or_else(|| AppError::new(2, format!("FX lookback of {months} months is out of range.")))?;
            let body = self.fetch_timeseries(&symbols, start, today)?;
            let out = monthly_series(body, currencies)?;
            for (currency, series) in &out {
                info!(pair = %currency.pair_key(), points = series.len(), "fetched FX series");
            }
            Ok(out)
        })
    }

    /// Fetch the current USD/<code> spot rates.
    pub fn fetch_latest(
        &self,
        currencies: &[Currency],
        cache: &ResponseCache<SpotRates>,
    ) -> Result<SpotRates, AppError> {
        if currencies.is_empty() {
            return Ok(SpotRates::new());
        }
        let symbols: Vec<&str> = currencies.iter().map(|c| c.code()).collect();
        let symbols = symbols.join(",");
        let key = format!("fx:latest:{BASE_CURRENCY}:{symbols}");

        cache.get_or_try_insert(&key, || {
            debug!(symbols = %symbols, "requesting FX latest");
            let body: LatestResponse =
                self.get_json("latest", &[("base", BASE_CURRENCY), ("symbols", symbols.as_str())])?;
            let rates = spot_rates(body, currencies)?;
            info!(pairs = rates.len(), "fetched FX spot rates");
            Ok(rates)
        })
    }

    fn fetch_timeseries(
        &self,
        symbols: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeseriesResponse, AppError> {
        debug!(symbols, %start, %end, "requesting FX timeseries");
        let start = start.to_string();
        let end = end.to_string();
        self.get_json(
            "timeseries",
            &[
                ("base", BASE_CURRENCY),
                ("symbols", symbols),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ],
        )
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T, AppError> {
        let url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));
        let mut req = self.client.get(&url).query(params);
        if let Some(key) = &self.access_key {
            req = req.query(&[("access_key", key.as_str())]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("FX request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FX request failed with status {}.", resp.status()),
            ));
        }

        resp.json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FX response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    rates: BTreeMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Pick the requested, finite rates out of a `{code: rate}` body.
fn spot_rates(body: LatestResponse, currencies: &[Currency]) -> Result<SpotRates, AppError> {
    if body.success == Some(false) {
        return Err(AppError::new(4, "FX provider reported an unsuccessful response."));
    }
    let mut out = SpotRates::new();
    for &currency in currencies {
        match body.rates.get(currency.code()) {
            Some(&rate) if rate.is_finite() => {
                out.insert(currency, rate);
            }
            _ => warn!(pair = %currency.pair_key(), "no FX spot rate returned"),
        }
    }
    Ok(out)
}

/// Fold `{date: {code: rate}}` rows into one month-end series per currency.
fn monthly_series(body: TimeseriesResponse, currencies: &[Currency]) -> Result<FxSeriesMap, AppError> {
    if body.success == Some(false) {
        return Err(AppError::new(4, "FX provider reported an unsuccessful response."));
    }

    let mut raw: BTreeMap<Currency, Vec<(NaiveDate, f64)>> =
        currencies.iter().map(|c| (*c, Vec::new())).collect();

    for (date, row) in &body.rates {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid FX date '{date}': {e}")))?;
        for (currency, points) in raw.iter_mut() {
            if let Some(&rate) = row.get(currency.code()) {
                points.push((date, rate));
            }
        }
    }

    Ok(raw
        .into_iter()
        .map(|(currency, points)| {
            let series = month_end(&Series::from_observations(points));
            if series.is_empty() {
                warn!(pair = %currency.pair_key(), "no FX observations returned");
            }
            (currency, series)
        })
        .collect())
}
