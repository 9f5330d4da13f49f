//! Formatted terminal output for a run.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays free of presentation concerns
//! - output changes are localized (important for future snapshot tests)
//!
//! Every unknown (`NaN`) value renders as `—`, never as `0`.

use chrono::NaiveDate;

use crate::analytics::Analysis;
use crate::data::SpotRates;
use crate::domain::{FxResult, IndicatorResult, Insight, Series, Unit};

/// Placeholder for values that are not known.
pub const PLACEHOLDER: &str = "—";

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Level value in the indicator's own unit: index with one decimal,
/// percent/rate with two decimals and a `%` sign.
pub fn format_number(value: f64, unit: Unit) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    match unit {
        Unit::Index => format!("{value:.1}"),
        Unit::Percent | Unit::Rate => format!("{value:.2}%"),
    }
}

/// Signed percentage change, e.g. `+1.2%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// FX rate with four decimals.
pub fn format_rate(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.4}")
}

/// Calendar date as `Mar 01, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Whole days between `date` and `today`, e.g. `3 days ago`.
///
/// Dates on or after `today` read as `today`.
pub fn format_age(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{d} days ago"),
    }
}

/// Unicode sparkline of the last `width` values.
pub fn sparkline(series: &Series, width: usize) -> String {
    let values = series.values();
    let tail = &values[values.len().saturating_sub(width)..];
    let (lo, hi) = tail
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if tail.is_empty() {
        return String::new();
    }

    let span = hi - lo;
    tail.iter()
        .map(|&v| {
            if span <= 0.0 {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let idx = ((v - lo) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Format the full run report: indicators, FX and insights.
pub fn format_report(analysis: &Analysis, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - Macro & FX Dashboard ===\n");
    match analysis.as_of() {
        Some(date) => out.push_str(&format!(
            "As-of: {} ({})\n",
            format_date(date),
            format_age(date, today)
        )),
        None => out.push_str(&format!("As-of: {PLACEHOLDER}\n")),
    }
    out.push('\n');

    out.push_str("Indicators:\n");
    out.push_str(&format_dashboard(&analysis.indicators));
    out.push('\n');

    if !analysis.fx.is_empty() {
        out.push_str("FX (USD base):\n");
        out.push_str(&format_fx_table(&analysis.fx));
        out.push('\n');
    }

    out.push_str(&format_insights(&analysis.insights));
    out
}

/// Indicator table: latest, MoM, YoY, trend, last update, recent shape.
pub fn format_dashboard(indicators: &[IndicatorResult]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<14} {:<24} {:>10} {:>8} {:>8} {:<16} {:<12} {}",
            "id", "label", "latest", "mom", "yoy", "trend", "updated", "last 12m"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<14} {:-<24} {:->10} {:->8} {:->8} {:-<16} {:-<12} {:-<12}",
            "", "", "", "", "", "", "", ""
        ),
    );

    for r in indicators {
        let trend = format!("{} {}", r.trend.icon(), r.trend.as_str());
        push_line(
            &mut out,
            format!(
                "{:<14} {:<24} {:>10} {:>8} {:>8} {:<16} {:<12} {}",
                r.id.key(),
                truncate(&r.label, 24),
                or_placeholder(r.deltas.latest_value(), |v| format_number(v, r.unit)),
                or_placeholder(r.deltas.mom_value(), format_percentage),
                or_placeholder(r.deltas.yoy_value(), format_percentage),
                trend,
                r.updated_at
                    .map(format_date)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                sparkline(&r.series, 12),
            ),
        );
    }
    out
}

/// FX table: latest rate, MoM, YoY per pair.
pub fn format_fx_table(fx: &[FxResult]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:<10} {:>14} {:>8} {:>8}", "pair", "rate", "mom", "yoy"),
    );
    push_line(
        &mut out,
        format!("{:-<10} {:->14} {:->8} {:->8}", "", "", "", ""),
    );
    for r in fx {
        push_line(
            &mut out,
            format!(
                "{:<10} {:>14} {:>8} {:>8}",
                r.currency.pair_label(),
                or_placeholder(r.deltas.latest_value(), format_rate),
                or_placeholder(r.deltas.mom_value(), format_percentage),
                or_placeholder(r.deltas.yoy_value(), format_percentage),
            ),
        );
    }
    out
}

/// Spot rate table for the `rates` view.
pub fn format_spot_rates(rates: &SpotRates) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<10} {:>14}", "pair", "spot"));
    push_line(&mut out, format!("{:-<10} {:->14}", "", ""));
    if rates.is_empty() {
        push_line(&mut out, format!("{:<10} {:>14}", PLACEHOLDER, PLACEHOLDER));
    }
    for (currency, rate) in rates {
        push_line(
            &mut out,
            format!("{:<10} {:>14}", currency.pair_label(), format_rate(*rate)),
        );
    }
    out
}

/// Numbered insight list with confidence.
pub fn format_insights(insights: &[Insight]) -> String {
    let mut out = String::from("Ideas:\n");
    if insights.is_empty() {
        out.push_str("  (no rules fired)\n");
        return out;
    }
    for (i, insight) in insights.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (confidence {:.0}%)\n   {}\n",
            i + 1,
            insight.title,
            insight.confidence * 100.0,
            insight.rationale
        ));
    }
    out
}

fn or_placeholder(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Currency, DeltaResult, IndicatorId, ObservationPoint, Trend};

    #[test]
    fn unknown_values_render_as_placeholder() {
        assert_eq!(format_number(f64::NAN, Unit::Index), "—");
        assert_eq!(format_percentage(f64::NAN), "—");
        assert_eq!(format_rate(f64::INFINITY), "—");
        // Zero is a real value.
        assert_eq!(format_percentage(0.0), "+0.0%");
    }

    #[test]
    fn numbers_follow_unit() {
        assert_eq!(format_number(307.456, Unit::Index), "307.5");
        assert_eq!(format_number(4.333, Unit::Percent), "4.33%");
        assert_eq!(format_number(6.5, Unit::Rate), "6.50%");
        assert_eq!(format_percentage(-0.26), "-0.3%");
        assert_eq!(format_percentage(3.14), "+3.1%");
        assert_eq!(format_rate(1650.12346), "1650.1235");
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        let s = Series::new(vec![
            ObservationPoint::new(d(1), 1.0),
            ObservationPoint::new(d(2), 5.0),
            ObservationPoint::new(d(3), 3.0),
        ]);
        assert_eq!(sparkline(&s, 12), "▁█▅");
        assert_eq!(sparkline(&s, 2), "█▁");
        assert_eq!(sparkline(&Series::default(), 12), "");
    }

    #[test]
    fn dashboard_lists_each_indicator() {
        let r = IndicatorResult {
            id: IndicatorId::Mortgage30us,
            label: "30-Year Mortgage Rate".to_string(),
            unit: Unit::Percent,
            deltas: DeltaResult { latest: 6.5, mom: -4.4, yoy: f64::NAN },
            trend: Trend::VolatileDown,
            updated_at: NaiveDate::from_ymd_opt(2025, 3, 6),
            series: Series::default(),
        };
        let table = format_dashboard(&[r]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with("MORTGAGE30US"));
        assert!(row.contains("6.50%"));
        assert!(row.contains("-4.4%"));
        assert!(row.contains("⚡↓ VOLATILE_DOWN"));
        assert!(row.contains("Mar 06, 2025"));
        assert!(row.contains('—'));
    }

    #[test]
    fn dates_and_ages() {
        let d = |m, day| NaiveDate::from_ymd_opt(2023, m, day).unwrap();
        assert_eq!(format_date(d(12, 25)), "Dec 25, 2023");
        assert_eq!(format_date(d(1, 5)), "Jan 05, 2023");
        assert_eq!(format_age(d(12, 25), d(12, 25)), "today");
        assert_eq!(format_age(d(12, 24), d(12, 25)), "1 day ago");
        assert_eq!(format_age(d(11, 25), d(12, 25)), "30 days ago");
        assert_eq!(format_age(d(12, 26), d(12, 25)), "today");
    }

    #[test]
    fn report_header_shows_as_of_age() {
        let r = IndicatorResult {
            id: IndicatorId::Cpi,
            label: "Consumer Price Index".to_string(),
            unit: Unit::Index,
            deltas: DeltaResult { latest: 310.3, mom: 0.2, yoy: 2.9 },
            trend: Trend::Rising,
            updated_at: NaiveDate::from_ymd_opt(2025, 3, 1),
            series: Series::default(),
        };
        let analysis = Analysis { indicators: vec![r], fx: Vec::new(), insights: Vec::new() };
        let today = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let text = format_report(&analysis, today);
        assert!(text.contains("As-of: Mar 01, 2025 (10 days ago)"));
        assert!(!text.contains("FX (USD base)"));
    }

    #[test]
    fn spot_rate_table() {
        let mut rates = SpotRates::new();
        rates.insert(Currency::Eur, 0.92);
        rates.insert(Currency::Ngn, 1532.5);
        let table = format_spot_rates(&rates);
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("USD/NGN") && rows[0].ends_with("1532.5000"));
        assert!(rows[1].starts_with("USD/EUR") && rows[1].ends_with("0.9200"));
        assert!(format_spot_rates(&SpotRates::new()).contains('—'));
    }

    #[test]
    fn insights_are_numbered() {
        let text = format_insights(&[Insight {
            title: "Refi check".to_string(),
            rationale: "Mortgage rates dropped.".to_string(),
            confidence: 0.65,
        }]);
        assert!(text.contains("1. Refi check (confidence 65%)"));
        assert!(format_insights(&[]).contains("no rules fired"));
    }
}
