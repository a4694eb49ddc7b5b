//! W3C date-time (W3CDTF) parsing for `dcterms:created` / `dcterms:modified`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse a W3CDTF timestamp.
///
/// Accepts full RFC 3339 values plus the reduced forms: `YYYY`, `YYYY-MM`,
/// `YYYY-MM-DD` and `YYYY-MM-DDThh:mm` with or without a zone designator. Values
/// without a zone are taken as UTC.
pub fn parse_w3cdtf(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }

    if value.contains('T') {
        return parse_date_time(value);
    }

    let date = match value.len() {
        4 => format!("{}-01-01", value),
        7 => format!("{}-01", value),
        _ => value.to_string(),
    };
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

fn parse_date_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => value.to_string(),
    };

    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed);
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc().fixed_offset());
        }
    }

    None
}
