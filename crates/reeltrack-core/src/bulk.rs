//! Parsing of the tab-separated bulk-add sheet.
//!
//! The sheet is what a spreadsheet produces on copy: a header row followed by
//! one row per post. Header names are matched case-insensitively after
//! stripping a byte-order mark and surrounding whitespace.

use crate::error::CoreError;
use crate::instagram::{handle_from_name, normalize_post_url, parse_profile_handle, parse_shortcode};
use crate::model::BulkRowError;

const COL_NAME: &str = "name";
const COL_PROFILE: &str = "profile link";
const COL_FOLLOWERS: &str = "followers";
const COL_LIVE: &str = "live link";

pub const NO_ROWS: &str = "No rows found in bulk text";
pub const MISSING_COLUMNS: &str =
    "Bulk format must include: Name, Profile Link, Followers, Live Link";
pub const MISSING_LIVE_LINK: &str = "Missing Live Link";
pub const NOT_A_POST_LINK: &str = "Live Link is not /reel/ or /p/ URL";
pub const UNRESOLVED_HANDLE: &str = "Could not resolve creator handle";
pub const DUPLICATE_POST_URL: &str = "Duplicate post URL";

/// A row that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEntry {
    /// 1-based line in the sheet; the header is line 1.
    pub line: usize,
    pub display_name: Option<String>,
    pub creator_handle: String,
    pub profile_url: Option<String>,
    pub followers_text: Option<String>,
    pub post_url: String,
    pub shortcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSheet {
    pub entries: Vec<BulkEntry>,
    pub errors: Vec<BulkRowError>,
}

struct Columns {
    name: usize,
    profile: usize,
    followers: usize,
    live: usize,
}

fn normalize_header(raw: &str) -> String {
    raw.replace('\u{feff}', "").trim().to_lowercase()
}

fn field(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Splits bulk text into insertable entries and per-line errors.
///
/// # Errors
///
/// Returns [`CoreError::BulkFormat`] when the sheet has no data rows or the
/// header lacks one of the required columns. Problems confined to a single
/// row are reported in [`BulkSheet::errors`] instead.
pub fn parse_bulk_rows(text: &str) -> Result<BulkSheet, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CoreError::BulkFormat(format!("Could not read bulk text: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| CoreError::BulkFormat(format!("Could not read bulk text: {e}")))?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(CoreError::BulkFormat(NO_ROWS.to_string()));
    }

    let position = |col: &str| headers.iter().position(|h| h == col);
    let (Some(name), Some(profile), Some(followers), Some(live)) = (
        position(COL_NAME),
        position(COL_PROFILE),
        position(COL_FOLLOWERS),
        position(COL_LIVE),
    ) else {
        return Err(CoreError::BulkFormat(MISSING_COLUMNS.to_string()));
    };
    let columns = Columns {
        name,
        profile,
        followers,
        live,
    };

    let mut sheet = BulkSheet::default();
    for (idx, record) in records.iter().enumerate() {
        let line = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(idx + 2);
        match parse_row(record, &columns, line) {
            Ok(entry) => sheet.entries.push(entry),
            Err(reason) => sheet.errors.push(BulkRowError {
                line,
                reason: reason.to_string(),
            }),
        }
    }
    Ok(sheet)
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    line: usize,
) -> Result<BulkEntry, &'static str> {
    let name = field(record, columns.name);
    let profile_link = field(record, columns.profile);
    let followers = field(record, columns.followers);
    let live_link = field(record, columns.live);

    if live_link.is_empty() {
        return Err(MISSING_LIVE_LINK);
    }
    let post_url = normalize_post_url(&live_link);
    let shortcode = parse_shortcode(&post_url).ok_or(NOT_A_POST_LINK)?;

    let creator_handle = parse_profile_handle(&profile_link)
        .or_else(|| handle_from_name(&name))
        .ok_or(UNRESOLVED_HANDLE)?;

    let profile_url = non_empty(profile_link).map(|p| normalize_post_url(&p));
    Ok(BulkEntry {
        line,
        display_name: non_empty(name),
        creator_handle,
        profile_url,
        followers_text: non_empty(followers),
        post_url,
        shortcode,
    })
}
