use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::PostRow;

/// Sort key assigned to posts whose views are unknown. Lower than any real count.
pub const MISSING_VIEWS_SENTINEL: i64 = -1;

/// Ordering of the post table by views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Asc,
    #[default]
    Desc,
}

impl SortMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::InvalidSortMode(s.to_string())),
        }
    }
}

fn views_key(row: &PostRow) -> i64 {
    row.views.unwrap_or(MISSING_VIEWS_SENTINEL)
}

/// Returns a new vector of `rows` ordered by views.
///
/// The input is never reordered. Both directions are stable, so posts with
/// equal views keep their input order. Unknown views sort below zero.
#[must_use]
pub fn sort_posts(rows: &[PostRow], mode: SortMode) -> Vec<PostRow> {
    let mut sorted = rows.to_vec();
    match mode {
        SortMode::Asc => sorted.sort_by_key(views_key),
        SortMode::Desc => sorted.sort_by(|a, b| views_key(b).cmp(&views_key(a))),
    }
    sorted
}
