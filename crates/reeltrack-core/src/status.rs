use crate::model::PostRow;

const DEFAULT_STATUS: &str = "pending";
const KNOWN_CATEGORIES: [&str; 4] = ["ok", "pending", "scheduled", "error"];

/// Display form of a post's fetch status.
///
/// `category` is the part of the status before the first `:` (`ok:apify` is
/// `ok`). It is an open string; unrecognised categories render with a
/// neutral style rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub category: String,
    pub text: String,
}

impl StatusBadge {
    #[must_use]
    pub fn from_row(source_status: Option<&str>, source_error: Option<&str>) -> Self {
        let status = source_status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS);
        let category = status.split(':').next().unwrap_or(status).to_string();
        let text = match source_error.filter(|e| !e.is_empty()) {
            Some(err) => format!("{status} ({err})"),
            None => status.to_string(),
        };
        Self { category, text }
    }

    #[must_use]
    pub fn for_post(row: &PostRow) -> Self {
        Self::from_row(row.source_status.as_deref(), row.source_error.as_deref())
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.category.as_str())
    }

    /// CSS class for the badge. Unknown categories share `status-unknown`.
    #[must_use]
    pub fn css_class(&self) -> String {
        if self.is_known() {
            format!("status-{}", self.category)
        } else {
            "status-unknown".to_string()
        }
    }
}
