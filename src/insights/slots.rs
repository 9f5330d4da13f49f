//! Named inputs for the insight rules.
//!
//! Each known slot is a field; a slot that was not fetched or analyzed is
//! `None`, and every rule reading it stays silent.

use crate::domain::{Currency, DeltaResult, FxResult, IndicatorId, IndicatorResult, Trend};

/// The fields a rule may read from one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotReading {
    pub latest: f64,
    pub mom: f64,
    pub yoy: f64,
    /// FX pairs carry no trend.
    pub trend: Option<Trend>,
}

impl SlotReading {
    pub fn new(latest: f64, mom: f64, yoy: f64) -> Self {
        Self {
            latest,
            mom,
            yoy,
            trend: None,
        }
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }
}

impl From<DeltaResult> for SlotReading {
    fn from(d: DeltaResult) -> Self {
        SlotReading::new(d.latest, d.mom, d.yoy)
    }
}

impl From<&IndicatorResult> for SlotReading {
    fn from(r: &IndicatorResult) -> Self {
        SlotReading::from(r.deltas).with_trend(r.trend)
    }
}

/// Every slot the rule table knows about.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketSlots {
    /// 3-month Treasury yield.
    pub dgs3mo: Option<SlotReading>,
    /// 10-year Treasury yield.
    pub dgs10: Option<SlotReading>,
    pub cpi: Option<SlotReading>,
    pub unrate: Option<SlotReading>,
    pub mortgage30us: Option<SlotReading>,
    pub usd_ngn: Option<SlotReading>,
}

impl MarketSlots {
    pub fn from_results(indicators: &[IndicatorResult], fx: &[FxResult]) -> Self {
        let mut slots = MarketSlots::default();
        for r in indicators {
            *slots.indicator_slot(r.id) = Some(SlotReading::from(r));
        }
        for r in fx {
            if let Some(slot) = slots.fx_slot(r.currency) {
                *slot = Some(SlotReading::from(r.deltas));
            }
        }
        slots
    }

    fn indicator_slot(&mut self, id: IndicatorId) -> &mut Option<SlotReading> {
        match id {
            IndicatorId::Cpi => &mut self.cpi,
            IndicatorId::Unrate => &mut self.unrate,
            IndicatorId::Dgs10 => &mut self.dgs10,
            IndicatorId::Dgs3mo => &mut self.dgs3mo,
            IndicatorId::Mortgage30us => &mut self.mortgage30us,
        }
    }

    /// Only pairs some rule reads have a slot.
    fn fx_slot(&mut self, currency: Currency) -> Option<&mut Option<SlotReading>> {
        match currency {
            Currency::Ngn => Some(&mut self.usd_ngn),
            Currency::Gbp | Currency::Eur => None,
        }
    }
}
