//! Lenient extraction of counts from provider JSON.
//!
//! Actors report counts as integers, floats, or display strings such as
//! `"1,234"` and `"1.2k"` depending on the source page.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static COMPACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)([kmb])$").expect("valid regex"));

const VIEW_KEYS: [&str; 3] = ["videoPlayCount", "videoViewCount", "playCount"];
const LIKE_KEYS: [&str; 2] = ["likesCount", "likes"];

/// Converts a JSON value to a count. Booleans, negative strings and anything
/// non-numeric yield `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => coerce_str(s),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_str(raw: &str) -> Option<i64> {
    let cleaned = raw.trim().replace(',', "").to_lowercase();
    if let Some(caps) = COMPACT_RE.captures(&cleaned) {
        let base: f64 = caps[1].parse().ok()?;
        let mult = match &caps[2] {
            "k" => 1_000.0,
            "m" => 1_000_000.0,
            _ => 1_000_000_000.0,
        };
        return Some((base * mult) as i64);
    }
    if !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return cleaned.parse().ok();
    }
    None
}

/// First non-zero count among `keys`, falling back to the first present one.
///
/// Some actors emit `0` in a key they do not populate while the real count
/// sits in a sibling key.
fn first_count(item: &Value, keys: &[&str]) -> Option<i64> {
    let counts: Vec<i64> = keys
        .iter()
        .filter_map(|k| item.get(*k).and_then(coerce_int))
        .collect();
    counts
        .iter()
        .copied()
        .find(|c| *c != 0)
        .or_else(|| counts.first().copied())
}

#[must_use]
pub fn resolve_views(item: &Value) -> Option<i64> {
    first_count(item, &VIEW_KEYS)
}

#[must_use]
pub fn resolve_likes(item: &Value) -> Option<i64> {
    first_count(item, &LIKE_KEYS)
}

/// `commentsCount`, else the length of a `comments` array, else `comments`
/// as a count.
#[must_use]
pub fn resolve_comments(item: &Value) -> Option<i64> {
    if let Some(count) = item.get("commentsCount").and_then(coerce_int) {
        return Some(count);
    }
    match item.get("comments") {
        Some(Value::Array(list)) => i64::try_from(list.len()).ok(),
        Some(other) => coerce_int(other),
        None => None,
    }
}
