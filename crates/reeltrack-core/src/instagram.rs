//! Instagram URL and handle rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/(?:reel|p)/([A-Za-z0-9_-]+)").expect("valid regex")
});

static PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"instagram\.com/([A-Za-z0-9._]+)/?$").expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Path segments that look like a handle but are not profiles.
const RESERVED_PATHS: [&str; 3] = ["reel", "p", "tv"];

pub const MIN_URL_LEN: usize = 10;
pub const MAX_URL_LEN: usize = 600;

/// Trims whitespace, drops the query string and strips trailing slashes.
#[must_use]
pub fn normalize_post_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_query = trimmed.split('?').next().unwrap_or(trimmed);
    without_query.trim_end_matches('/').to_string()
}

/// Shortcode of a `/reel/<code>` or `/p/<code>` URL.
#[must_use]
pub fn parse_shortcode(url: &str) -> Option<String> {
    SHORTCODE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Handle from a profile URL such as `https://instagram.com/some.creator/`.
#[must_use]
pub fn parse_profile_handle(url: &str) -> Option<String> {
    let normalized = normalize_post_url(url);
    let handle = PROFILE_RE
        .captures(&normalized)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())?;
    if RESERVED_PATHS.contains(&handle.to_ascii_lowercase().as_str()) {
        return None;
    }
    Some(handle)
}

/// Strips whitespace and any leading `@`.
#[must_use]
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_string()
}

/// Fallback handle derived from a display name: lowercased, whitespace runs
/// replaced by `_`, surrounding underscores stripped.
#[must_use]
pub fn handle_from_name(name: &str) -> Option<String> {
    let lowered = name.trim().to_lowercase();
    let handle = WHITESPACE_RE.replace_all(&lowered, "_");
    let handle = handle.trim_matches('_');
    (!handle.is_empty()).then(|| handle.to_string())
}

/// Validates a post URL and returns its normalized form.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPostUrl`] with a user-facing message when the
/// URL has the wrong length, is not an Instagram URL, or is not a reel/post
/// link.
pub fn validate_post_url(url: &str) -> Result<String, CoreError> {
    let trimmed = url.trim();
    let len = trimmed.chars().count();
    if !(MIN_URL_LEN..=MAX_URL_LEN).contains(&len) {
        return Err(CoreError::InvalidPostUrl(format!(
            "post_url must be between {MIN_URL_LEN} and {MAX_URL_LEN} characters"
        )));
    }
    if !trimmed.contains("instagram.com") {
        return Err(CoreError::InvalidPostUrl(
            "post_url must be an Instagram URL".to_string(),
        ));
    }
    let normalized = normalize_post_url(trimmed);
    if parse_shortcode(&normalized).is_none() {
        return Err(CoreError::InvalidPostUrl(
            "post_url must be a Reel/Post link like /reel/... or /p/...".to_string(),
        ));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_query_and_trailing_slash() {
        assert_eq!(
            normalize_post_url("  https://www.instagram.com/reel/Cx1_a-B/?igsh=abc  "),
            "https://www.instagram.com/reel/Cx1_a-B"
        );
        assert_eq!(
            normalize_post_url("https://instagram.com/p/XYZ//"),
            "https://instagram.com/p/XYZ"
        );
    }

    #[test]
    fn shortcode_from_reel_and_post_links() {
        assert_eq!(
            parse_shortcode("https://www.instagram.com/reel/Cx1_a-B"),
            Some("Cx1_a-B".to_string())
        );
        assert_eq!(
            parse_shortcode("https://instagram.com/p/XYZ123/"),
            Some("XYZ123".to_string())
        );
        assert_eq!(parse_shortcode("https://instagram.com/tv/XYZ123"), None);
        assert_eq!(parse_shortcode("https://instagram.com/some.creator"), None);
    }

    #[test]
    fn profile_handle_parsing() {
        assert_eq!(
            parse_profile_handle("https://www.instagram.com/some.creator_1/"),
            Some("some.creator_1".to_string())
        );
        assert_eq!(
            parse_profile_handle("https://instagram.com/someone?hl=en"),
            Some("someone".to_string())
        );
        assert_eq!(parse_profile_handle("https://instagram.com/reel/"), None);
        assert_eq!(parse_profile_handle("https://instagram.com/p"), None);
        assert_eq!(parse_profile_handle("https://example.com/someone"), None);
    }

    #[test]
    fn handle_normalization() {
        assert_eq!(normalize_handle(" @alice "), "alice");
        assert_eq!(normalize_handle("bob"), "bob");
    }

    #[test]
    fn handle_from_display_name() {
        assert_eq!(handle_from_name("Jane  Doe"), Some("jane_doe".to_string()));
        assert_eq!(handle_from_name("  "), None);
    }

    #[test]
    fn validate_accepts_reel_link() {
        assert_eq!(
            validate_post_url("https://www.instagram.com/reel/abc123/?x=1"),
            Ok("https://www.instagram.com/reel/abc123".to_string())
        );
    }

    #[test]
    fn validate_rejects_bad_urls_with_user_facing_messages() {
        let err = validate_post_url("https://www.tiktok.com/@a/video/1").unwrap_err();
        assert_eq!(err.to_string(), "post_url must be an Instagram URL");

        let err = validate_post_url("https://www.instagram.com/alice").unwrap_err();
        assert_eq!(
            err.to_string(),
            "post_url must be a Reel/Post link like /reel/... or /p/..."
        );

        assert!(validate_post_url("short").is_err());
        let long = format!("https://www.instagram.com/reel/{}", "a".repeat(600));
        assert!(validate_post_url(&long).is_err());
    }
}
