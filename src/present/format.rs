use chrono::NaiveDateTime;

pub const MISSING: &str = "-";
pub const NOT_AVAILABLE: &str = "N/A";

/// Fraction in [0, 1] to percent units for chart values. Every rate is
/// scaled through here or through `percent`.
pub fn to_percent_units(rate: f64) -> f64 {
    rate * 100.0
}

/// Fraction in [0, 1] to `42.0%`.
///
/// `{:.1}` rounds the exact binary value, so ties land like JavaScript's
/// `toFixed(1)`: `0.0015` is `0.1%`, not `0.2%`.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", to_percent_units(rate))
}

pub fn percent_opt(rate: Option<f64>) -> String {
    rate.map(percent).unwrap_or_else(|| MISSING.to_string())
}

pub fn fixed(value: f64, places: usize) -> String {
    format!("{:.*}", places, value)
}

pub fn fixed_opt(value: Option<f64>, places: usize) -> String {
    value
        .map(|v| fixed(v, places))
        .unwrap_or_else(|| MISSING.to_string())
}

/// `+48`, `-12`, `0`
pub fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

pub fn signed_fixed(delta: f64, places: usize) -> String {
    if delta > 0.0 {
        format!("+{:.*}", places, delta)
    } else {
        format!("{:.*}", places, delta)
    }
}

/// `17.5 min`; zero or missing durations render as `-`
pub fn minutes(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("{:.1} min", v),
        _ => MISSING.to_string(),
    }
}

/// `01/05/2024 12:30`
pub fn timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Short axis label `01/05 12:30`, or the raw label when it did not parse
pub fn chart_label(value: Option<NaiveDateTime>, raw: &str) -> String {
    value
        .map(|t| t.format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
