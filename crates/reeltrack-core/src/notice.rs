//! User-facing action summaries.

use std::fmt;

use crate::model::{BulkAddResponse, DeleteAllResponse, DeleteCreatorResponse, PollResponse};

/// Shown when a request never produced a usable server response.
pub const TRANSPORT_FAILURE: &str = "Request failed. Check your connection and try again.";

pub const DELETE_ALL_PROMPT: &str =
    "Delete ALL campaigns, creators, posts and snapshots? This cannot be undone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.text)
    }
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn post_added(handle: &str, campaign: &str) -> Self {
        Self::success(format!("Added post for @{handle} to {campaign}."))
    }

    /// Partial success downgrades to a warning; it is never an error.
    #[must_use]
    pub fn bulk_added(resp: &BulkAddResponse) -> Self {
        let fetched = resp.initial_polled.unwrap_or(0);
        let mut text = format!(
            "Inserted {} post(s), fetched {fetched} immediately.",
            resp.inserted
        );
        if resp.errors.is_empty() {
            return Self::success(text);
        }
        let details: Vec<String> = resp
            .errors
            .iter()
            .map(|e| format!("line {}: {}", e.line, e.reason))
            .collect();
        text.push_str(&format!(
            " Skipped {} row(s): {}",
            resp.errors.len(),
            details.join("; ")
        ));
        Self::warning(text)
    }

    #[must_use]
    pub fn all_data_deleted(resp: &DeleteAllResponse) -> Self {
        Self::success(format!(
            "Deleted {} campaign(s), {} creator(s), {} post(s), {} snapshot(s).",
            resp.deleted_campaigns,
            resp.deleted_creators,
            resp.deleted_posts,
            resp.deleted_snapshots
        ))
    }

    #[must_use]
    pub fn creator_deleted(resp: &DeleteCreatorResponse) -> Self {
        Self::success(format!(
            "Deleted @{}: {} post(s), {} snapshot(s).",
            resp.creator_handle, resp.deleted_posts, resp.deleted_snapshots
        ))
    }

    #[must_use]
    pub fn polled(resp: &PollResponse) -> Self {
        Self::success(format!("Polled {} post(s).", resp.polled))
    }
}

#[must_use]
pub fn delete_creator_prompt(handle: &str) -> String {
    format!("Delete @{handle} and all of their posts and snapshot history across every campaign?")
}
