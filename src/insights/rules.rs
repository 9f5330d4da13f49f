//! The canonical insight rule table.
//!
//! Rules are listed in evaluation order. Thresholds and confidences are fixed
//! priors, not fitted to data. Comparisons against a `NaN` field are false,
//! so an unknown value never fires a rule.

use crate::domain::Trend;
use crate::insights::slots::{MarketSlots, SlotReading};

/// Rationale text: fixed, or built from the slot values.
#[derive(Clone, Copy)]
pub enum Rationale {
    Fixed(&'static str),
    Dynamic(fn(&MarketSlots) -> String),
}

/// One (predicate, insight template) pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub title: &'static str,
    pub confidence: f64,
    pub applies: fn(&MarketSlots) -> bool,
    pub rationale: Rationale,
}

impl Rule {
    pub fn render_rationale(&self, slots: &MarketSlots) -> String {
        match self.rationale {
            Rationale::Fixed(text) => text.to_string(),
            Rationale::Dynamic(build) => build(slots),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("title", &self.title)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Threshold for the FX conversion rule (absolute MoM, percent).
pub const FX_MOVE_THRESHOLD: f64 = 3.0;

pub static RULES: [Rule; 7] = [
    Rule {
        title: "Earn yield on idle cash",
        confidence: 0.9,
        applies: idle_cash,
        rationale: Rationale::Fixed(
            "Short T-Bills/HYSA may offer attractive yields versus checking accounts.",
        ),
    },
    Rule {
        title: "Stay short duration",
        confidence: 0.7,
        applies: stay_short,
        rationale: Rationale::Fixed(
            "Yield curve inversion with non-falling inflation favors short-duration over long bonds.",
        ),
    },
    Rule {
        title: "Consider intermediate bonds",
        confidence: 0.6,
        applies: intermediate_bonds,
        rationale: Rationale::Fixed(
            "Falling 10-year yields with low unemployment suggests duration exposure may be favorable.",
        ),
    },
    Rule {
        title: "Risk-on DCA",
        confidence: 0.6,
        applies: risk_on,
        rationale: Rationale::Fixed(
            "Improving labor + non-accelerating inflation supports steady DCA into broad equities.",
        ),
    },
    Rule {
        title: "De-risk portfolio",
        confidence: 0.65,
        applies: de_risk,
        rationale: Rationale::Fixed(
            "Rising/volatile inflation suggests increasing cash buffer and defensive positioning.",
        ),
    },
    Rule {
        title: "Refi check",
        confidence: 0.65,
        applies: refi_check,
        rationale: Rationale::Fixed("Mortgage rates dropped ≥0.25% MoM; consider a refinance quote."),
    },
    Rule {
        title: "Optimize cross-currency conversions",
        confidence: 0.8,
        applies: fx_move,
        rationale: Rationale::Dynamic(fx_move_rationale),
    },
];

fn idle_cash(s: &MarketSlots) -> bool {
    s.dgs3mo.is_some_and(|d3| d3.latest >= 4.5)
}

fn stay_short(s: &MarketSlots) -> bool {
    match (s.dgs3mo, s.dgs10, s.cpi) {
        (Some(d3), Some(d10), Some(cpi)) => d3.latest >= d10.latest && cpi.yoy >= 0.0,
        _ => false,
    }
}

fn intermediate_bonds(s: &MarketSlots) -> bool {
    match (s.dgs10, s.unrate) {
        (Some(d10), Some(un)) => d10.mom < 0.0 && un.latest <= 4.0,
        _ => false,
    }
}

fn risk_on(s: &MarketSlots) -> bool {
    match (s.unrate, s.cpi) {
        (Some(un), Some(cpi)) => un.yoy <= -0.2 && cpi.mom <= 0.0,
        _ => false,
    }
}

fn de_risk(s: &MarketSlots) -> bool {
    s.cpi
        .is_some_and(|cpi| cpi.mom > 0.3 || cpi.trend == Some(Trend::VolatileUp))
}

fn refi_check(s: &MarketSlots) -> bool {
    s.mortgage30us.is_some_and(|m| m.mom <= -0.25)
}

fn fx_move(s: &MarketSlots) -> bool {
    s.usd_ngn.is_some_and(|fx| fx.mom.abs() >= FX_MOVE_THRESHOLD)
}

fn fx_move_rationale(s: &MarketSlots) -> String {
    // USD-per-unit rising means the quote currency buys less USD.
    let direction = match s.usd_ngn {
        Some(SlotReading { mom, .. }) if mom > 0.0 => "weakening",
        _ => "strengthening",
    };
    format!(
        "NGN {direction} >3% MoM against USD. Use big monthly moves to batch or stagger transfers depending on direction."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidences_are_probabilities() {
        for rule in &RULES {
            assert!((0.0..=1.0).contains(&rule.confidence), "{rule:?}");
        }
    }

    #[test]
    fn empty_slots_fire_nothing() {
        let slots = MarketSlots::default();
        assert!(RULES.iter().all(|r| !(r.applies)(&slots)));
    }

    #[test]
    fn nan_fields_do_not_fire() {
        let unknown = SlotReading::new(f64::NAN, f64::NAN, f64::NAN);
        let slots = MarketSlots {
            dgs3mo: Some(unknown),
            dgs10: Some(unknown),
            cpi: Some(unknown),
            unrate: Some(unknown),
            mortgage30us: Some(unknown),
            usd_ngn: Some(unknown),
            ..Default::default()
        };
        assert!(RULES.iter().all(|r| !(r.applies)(&slots)));
    }

    #[test]
    fn refi_threshold_is_a_relative_change() {
        // 6.50 -> 6.48 is -0.31% relative, only 2bp.
        let slots = MarketSlots {
            mortgage30us: Some(SlotReading::new(6.48, (6.48 / 6.50 - 1.0) * 100.0, 0.0)),
            ..Default::default()
        };
        assert!(refi_check(&slots));
        let text = RULES[5].render_rationale(&slots);
        assert!(text.contains("≥0.25% MoM"));
        assert!(!text.contains("bp"));
    }

    #[test]
    fn de_risk_fires_on_volatile_cpi_alone() {
        let slots = MarketSlots {
            cpi: Some(SlotReading::new(310.0, 0.1, 3.0).with_trend(Trend::VolatileUp)),
            ..Default::default()
        };
        assert!(de_risk(&slots));
        assert!(!refi_check(&slots));
    }

    #[test]
    fn fx_rationale_names_direction() {
        let up = MarketSlots {
            usd_ngn: Some(SlotReading::new(1600.0, 3.5, 10.0)),
            ..Default::default()
        };
        assert!(fx_move_rationale(&up).contains("weakening"));

        let down = MarketSlots {
            usd_ngn: Some(SlotReading::new(1400.0, -3.0, -5.0)),
            ..Default::default()
        };
        assert!(fx_move(&down));
        assert!(fx_move_rationale(&down).contains("strengthening"));
    }
}
