//! HTTP client for the Apify actor that scrapes Instagram post metrics.
//!
//! One call runs the actor synchronously for a single post URL and reads the
//! first item of the resulting dataset.

use std::time::Duration;

use reeltrack_core::AppConfig;
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::coerce::{resolve_comments, resolve_likes, resolve_views};
use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

pub const PROVIDER: &str = "apify";

const USER_AGENT: &str = "reeltrack/0.1 (engagement-tracking)";
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_500);
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Metrics read from one actor run. At least one field is `Some`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostMetrics {
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
}

/// Client for the Apify `run-sync-get-dataset-items` endpoint.
///
/// A client without a token can still be constructed; every fetch then fails
/// with [`ScraperError::MissingToken`], which the poller records as an error
/// snapshot.
pub struct ApifyClient {
    client: Client,
    token: Option<String>,
    actor_id: String,
    base_url: Url,
    max_attempts: u32,
    base_delay: Duration,
}

impl ApifyClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] if
    /// `APIFY_BASE_URL` is not a valid URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::with_base_url(
            config.apify_token.as_deref(),
            &config.apify_actor_id,
            config.apify_timeout_secs,
            &config.apify_base_url,
        )?
        .with_retry(config.fetch_retry_count, DEFAULT_BASE_DELAY))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        token: Option<&str>,
        actor_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            actor_id: actor_id.trim().to_owned(),
            base_url: parsed,
            max_attempts: 1,
            base_delay: DEFAULT_BASE_DELAY,
        })
    }

    /// Sets the total attempts per fetch and the linear back-off step.
    #[must_use]
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    fn endpoint(&self) -> Result<Url, ScraperError> {
        let actor_path = self.actor_id.replace('/', "~");
        self.base_url
            .join(&format!("v2/acts/{actor_path}/run-sync-get-dataset-items"))
            .map_err(|e| ScraperError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Runs the actor once for `post_url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingToken`] if no token is configured.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ScraperError::Deserialize`] if the body is not JSON.
    /// - [`ScraperError::EmptyDataset`] if the dataset has no items.
    /// - [`ScraperError::MissingMetrics`] if the first item has no counts.
    pub async fn fetch_metrics_once(&self, post_url: &str) -> Result<PostMetrics, ScraperError> {
        let token = self.token.as_deref().ok_or(ScraperError::MissingToken)?;
        let url = self.endpoint()?;

        let response = self
            .client
            .post(url)
            .query(&[("token", token)])
            .json(&json!({ "username": [post_url] }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let items: Value =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("dataset items for {post_url}"),
                source: e,
            })?;
        let first = items
            .as_array()
            .and_then(|list| list.first())
            .ok_or(ScraperError::EmptyDataset)?;

        let metrics = extract_metrics(first);
        if metrics == PostMetrics::default() {
            return Err(ScraperError::MissingMetrics);
        }
        Ok(metrics)
    }

    /// Runs the actor for `post_url`, retrying with linear back-off.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingToken`] immediately when no token is
    /// configured, otherwise [`ScraperError::Exhausted`] once every attempt
    /// has failed.
    pub async fn fetch_metrics(&self, post_url: &str) -> Result<PostMetrics, ScraperError> {
        retry_with_backoff(self.max_attempts, self.base_delay, PROVIDER, || {
            self.fetch_metrics_once(post_url)
        })
        .await
    }
}

/// Counts from one dataset item. Non-object items yield no counts.
#[must_use]
pub fn extract_metrics(item: &Value) -> PostMetrics {
    if !item.is_object() {
        return PostMetrics::default();
    }
    PostMetrics {
        views: resolve_views(item),
        likes: resolve_likes(item),
        comments: resolve_comments(item),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
