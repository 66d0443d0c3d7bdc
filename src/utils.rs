/// Utility functions
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// Naive layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Reduce an angle in degrees into [0, 360)
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Reduce an angle in degrees into (-180, 180]
pub fn signed_degrees(deg: f64) -> f64 {
    let r = normalize_degrees(deg);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Clamp the argument of asin/acos into their domain
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Accepted calendar years for caller-supplied timestamps
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Parse a caller-supplied timestamp. Years outside `YEAR_RANGE` are rejected.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_any(s.trim()).filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn parse_any(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    if let Ok(n) = s.parse::<i64>() {
        return Utc.timestamp_opt(n, 0).single();
    }
    None
}

/// Round to the given number of decimals, for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
