//! Number, metric and date formatting shared by every view.
//!
//! Two integer formatters exist on purpose. [`format_number`] is for
//! count-style totals that are never absent and renders `None` as `0`.
//! [`format_metric`] is for per-post metrics and renders `None` as `-`, so a
//! post that has not been fetched yet never looks like a post with zero views.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Placeholder for a missing value.
pub const MISSING: &str = "-";

const DATE_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Suffixes for [`format_compact`], smallest first.
const COMPACT_UNITS: [(u64, &str); 4] = [
    (1_000, "K"),
    (1_000_000, "M"),
    (1_000_000_000, "B"),
    (1_000_000_000_000, "T"),
];

/// Comma-grouped integer; `None` renders as `0`.
#[must_use]
pub fn format_number(value: Option<i64>) -> String {
    group_thousands(value.unwrap_or(0))
}

/// Comma-grouped integer; `None` renders as [`MISSING`].
#[must_use]
pub fn format_metric(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), group_thousands)
}

/// Short magnitude form with at most one decimal (`12345` -> `12.3K`).
///
/// `None` renders as `0`. Values that round up to 1000 of one unit roll over
/// into the next (`999_999` -> `1M`).
#[must_use]
pub fn format_compact(value: Option<i64>) -> String {
    let value = value.unwrap_or(0);
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();

    let Some(mut idx) = COMPACT_UNITS
        .iter()
        .rposition(|(unit, _)| magnitude >= *unit)
    else {
        return format!("{sign}{magnitude}");
    };

    loop {
        let (unit, suffix) = COMPACT_UNITS[idx];
        let unit = u128::from(unit);
        let tenths = (u128::from(magnitude) * 10 + unit / 2) / unit;
        if tenths >= 10_000 && idx + 1 < COMPACT_UNITS.len() {
            idx += 1;
            continue;
        }
        let whole = tenths / 10;
        let fraction = tenths % 10;
        return if fraction == 0 {
            format!("{sign}{whole}{suffix}")
        } else {
            format!("{sign}{whole}.{fraction}{suffix}")
        };
    }
}

/// Timestamp in the viewer's local time zone.
///
/// `None` or an empty string renders as [`MISSING`]; a string that does not
/// parse is returned unchanged.
#[must_use]
pub fn format_date(iso: Option<&str>) -> String {
    format_date_in(iso, &Local)
}

/// [`format_date`] against an explicit time zone.
#[must_use]
pub fn format_date_in<Tz>(iso: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(raw) = iso.filter(|s| !s.is_empty()) else {
        return MISSING.to_owned();
    };
    parse_timestamp(raw, tz).map_or_else(
        || raw.to_owned(),
        |dt| dt.format(DATE_FORMAT).to_string(),
    )
}

fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(tz));
    }
    // Space-separated timestamps with an offset, as Postgres prints them.
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.with_timezone(tz));
        }
    }
    // Naive timestamps are wall-clock time in the viewer's zone.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    // Bare dates are midnight UTC.
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
