//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during one analytics run
//! - exported to JSON/CSV
//! - reloaded later from a saved snapshot

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Multiplier applied to recent volatility by the trend classifier's volatility gate.
pub const VOLATILITY_MULTIPLIER: f64 = 1.25;

/// One dated observation of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ObservationPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered observation sequence for one named quantity.
///
/// The analytics core trusts the ordering contract: dates strictly increasing,
/// values finite. Use [`Series::from_observations`] on raw upstream data to
/// establish it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<ObservationPoint>);

impl Series {
    /// Wrap points that already satisfy the ordering contract.
    pub fn new(points: Vec<ObservationPoint>) -> Self {
        Self(points)
    }

    /// Normalize raw observations: drop non-finite values, sort by date and
    /// keep the last value seen for a repeated date.
    pub fn from_observations(raw: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut points: Vec<ObservationPoint> = raw
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(date, value)| ObservationPoint::new(date, value))
            .collect();
        // Stable sort keeps arrival order within a date, so the last one wins below.
        points.sort_by_key(|p| p.date);

        let mut out: Vec<ObservationPoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(prev) if prev.date == p.date => *prev = p,
                _ => out.push(p),
            }
        }
        Self(out)
    }

    pub fn points(&self) -> &[ObservationPoint] {
        &self.0
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&ObservationPoint> {
        self.0.last()
    }

    /// The `k`-th value counting back from the end (`1` = latest).
    pub fn value_back(&self, k: usize) -> Option<f64> {
        if k == 0 || k > self.0.len() {
            return None;
        }
        Some(self.0[self.0.len() - k].value)
    }
}

/// How a series is quoted. Drives formatting and the trend stability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Index,
    Percent,
    Rate,
}

impl Unit {
    /// Absolute MoM (percentage points) at or below which a series is `Stable`.
    pub fn stable_band(self) -> f64 {
        match self {
            Unit::Index => 0.1,
            Unit::Percent | Unit::Rate => 0.15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Index => "index",
            Unit::Percent => "percent",
            Unit::Rate => "rate",
        }
    }
}

/// Latest value plus month-over-month and year-over-year percentage changes.
///
/// Each field is `NaN` when undefined (short series or zero divisor). `NaN`
/// means "unknown", which is never the same as a `0.0` change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaResult {
    pub latest: f64,
    pub mom: f64,
    pub yoy: f64,
}

impl DeltaResult {
    pub const UNKNOWN: DeltaResult = DeltaResult {
        latest: f64::NAN,
        mom: f64::NAN,
        yoy: f64::NAN,
    };

    pub fn latest_value(&self) -> Option<f64> {
        known(self.latest)
    }

    pub fn mom_value(&self) -> Option<f64> {
        known(self.mom)
    }

    pub fn yoy_value(&self) -> Option<f64> {
        known(self.yoy)
    }
}

fn known(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Trend label for an indicator's latest move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Rising,
    Falling,
    VolatileUp,
    VolatileDown,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Rising => "RISING",
            Trend::Falling => "FALLING",
            Trend::VolatileUp => "VOLATILE_UP",
            Trend::VolatileDown => "VOLATILE_DOWN",
            Trend::Stable => "STABLE",
        }
    }

    /// Short glyph for terminal tables.
    pub fn icon(self) -> &'static str {
        match self {
            Trend::Rising => "↑",
            Trend::Falling => "↓",
            Trend::VolatileUp => "⚡↑",
            Trend::VolatileDown => "⚡↓",
            Trend::Stable => "→",
        }
    }
}

/// The economic indicators tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorId {
    Cpi,
    Unrate,
    Dgs10,
    Dgs3mo,
    Mortgage30us,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 5] = [
        IndicatorId::Cpi,
        IndicatorId::Unrate,
        IndicatorId::Dgs10,
        IndicatorId::Dgs3mo,
        IndicatorId::Mortgage30us,
    ];

    /// Slot key used in reports and exports.
    pub fn key(self) -> &'static str {
        match self {
            IndicatorId::Cpi => "CPI",
            IndicatorId::Unrate => "UNRATE",
            IndicatorId::Dgs10 => "DGS10",
            IndicatorId::Dgs3mo => "DGS3MO",
            IndicatorId::Mortgage30us => "MORTGAGE30US",
        }
    }

    /// FRED series id backing this indicator.
    pub fn series_id(self) -> &'static str {
        match self {
            IndicatorId::Cpi => "CPIAUCSL",
            IndicatorId::Unrate => "UNRATE",
            IndicatorId::Dgs10 => "DGS10",
            IndicatorId::Dgs3mo => "DGS3MO",
            IndicatorId::Mortgage30us => "MORTGAGE30US",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndicatorId::Cpi => "Consumer Price Index",
            IndicatorId::Unrate => "Unemployment Rate",
            IndicatorId::Dgs10 => "10-Year Treasury",
            IndicatorId::Dgs3mo => "3-Month Treasury",
            IndicatorId::Mortgage30us => "30-Year Mortgage Rate",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            IndicatorId::Cpi => Unit::Index,
            _ => Unit::Percent,
        }
    }
}

/// Quote currencies tracked against USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ngn,
    Gbp,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Ngn, Currency::Gbp, Currency::Eur];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Ngn => "NGN",
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
        }
    }

    /// Slot key of the USD-based pair, e.g. `USDNGN`.
    pub fn pair_key(self) -> String {
        format!("USD{}", self.code())
    }

    /// Display form of the pair, e.g. `USD/NGN`.
    pub fn pair_label(self) -> String {
        format!("USD/{}", self.code())
    }
}

/// Derived view of one indicator for a single run.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorResult {
    pub id: IndicatorId,
    pub label: String,
    pub unit: Unit,
    pub deltas: DeltaResult,
    pub trend: Trend,
    /// Date of the latest observation (`None` for an empty series).
    pub updated_at: Option<NaiveDate>,
    pub series: Series,
}

/// Derived view of one USD-based FX pair for a single run.
#[derive(Debug, Clone, Serialize)]
pub struct FxResult {
    pub currency: Currency,
    pub deltas: DeltaResult,
    pub series: Series,
}

/// A short, rule-generated recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub rationale: String,
    /// Fixed prior belief in the rule, always within `[0, 1]`.
    pub confidence: f64,
}

/// What to do with a series too short for a year-over-year change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsufficientDataPolicy {
    /// Fail the whole run with an insufficient-data error.
    #[default]
    Fail,
    /// Keep going; undefined fields stay `NaN` and render as placeholders.
    Placeholder,
}

/// All raw series for one run, as handed from the fetch layer to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub indicators: BTreeMap<IndicatorId, Series>,
    pub fx: BTreeMap<Currency, Series>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// FRED lookback window in months.
    pub months: u32,
    /// FX lookback window in months.
    pub fx_months: u32,
    pub currencies: Vec<Currency>,
    pub policy: InsufficientDataPolicy,

    /// Load series from this JSON snapshot instead of fetching.
    pub snapshot_in: Option<PathBuf>,
    /// Save fetched series to this JSON snapshot.
    pub snapshot_out: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            months: 60,
            fx_months: 14,
            currencies: Currency::ALL.to_vec(),
            policy: InsufficientDataPolicy::Fail,
            snapshot_in: None,
            snapshot_out: None,
        }
    }
}
