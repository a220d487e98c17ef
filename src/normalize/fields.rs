use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const LIST_DELIMITERS: [char; 3] = [',', '|', ';'];

/// First key holding a non-null value
pub fn pick<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Number or numeric string
fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// First key holding something numeric
pub fn pick_f64(obj: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_f64)
}

/// Like `pick_f64`, rounded to the nearest integer
pub fn pick_i64(obj: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(|value| {
        value
            .as_i64()
            .or_else(|| as_f64(value).map(|v| v.round() as i64))
    })
}

/// Non-negative integer
pub fn pick_u64(obj: &Value, keys: &[&str]) -> Option<u64> {
    pick_i64(obj, keys).and_then(|v| u64::try_from(v).ok())
}

/// First key holding a non-blank string (numbers are stringified)
pub fn pick_str(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// First key holding a parseable timestamp
pub fn pick_timestamp(obj: &Value, keys: &[&str]) -> Option<NaiveDateTime> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(Value::as_str)
        .find_map(parse_timestamp)
}

/// Parse RFC 3339 or naive ISO-8601 timestamps; offsets are converted to UTC
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Split `"a, b, c"`, `"a|b|c"` or `"a;b;c"` into trimmed, non-empty parts
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(&LIST_DELIMITERS[..])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a list-ish value into a sequence of strings.
///
/// Arrays go through the same trim/drop-empty rule as delimited strings, so
/// normalizing an already normalized list returns it unchanged.
pub fn to_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_list(s),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// List from the first key that is present
pub fn pick_list(obj: &Value, keys: &[&str]) -> Vec<String> {
    pick(obj, keys).map(to_list).unwrap_or_default()
}

/// Records of a collection payload: array elements or object values
pub fn records(raw: &Value) -> Vec<&Value> {
    match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}
