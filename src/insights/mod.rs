//! Rule-based insight generation.
//!
//! The rule table (`rules::RULES`) is walked in declaration order against a
//! closed set of named slots (`slots::MarketSlots`). The first
//! [`MAX_INSIGHTS`] rules that fire are returned as-is: order is the table's
//! order, never confidence.

pub mod rules;
pub mod slots;

pub use rules::{RULES, Rule};
pub use slots::{MarketSlots, SlotReading};

use crate::domain::Insight;

/// Upper bound on insights per run.
pub const MAX_INSIGHTS: usize = 5;

/// Evaluate the canonical rule table.
pub fn evaluate(slots: &MarketSlots) -> Vec<Insight> {
    evaluate_rules(&RULES, slots)
}

/// Evaluate an arbitrary rule table, keeping the first `MAX_INSIGHTS` hits.
pub fn evaluate_rules(rules: &[Rule], slots: &MarketSlots) -> Vec<Insight> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(slots))
        .take(MAX_INSIGHTS)
        .map(|rule| Insight {
            title: rule.title.to_string(),
            rationale: rule.render_rationale(slots),
            confidence: rule.confidence,
        })
        .collect()
}
