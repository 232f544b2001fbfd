//! Thin JSON client for the reeltrack HTTP API.
//!
//! Every call is a single request with no retries. Non-2xx responses surface
//! the server's `detail` so the caller can show it verbatim.

use std::time::Duration;

use reeltrack_core::{
    notice::TRANSPORT_FAILURE, AddPostRequest, AddPostResponse, BulkAddRequest, BulkAddResponse,
    CampaignDashboardResponse, CronResponse, DashboardResponse, DeleteAllResponse,
    DeleteCreatorResponse, ErrorDetail, PollRequest, PollResponse,
};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

const USER_AGENT: &str = "reeltrack-cli/0.1";
const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL {base_url}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response. `detail` is empty when the body carried none.
    #[error("server returned HTTP {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Text for a failure notice: the server's `detail` when it sent one,
    /// otherwise the generic transport message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            _ => TRANSPORT_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %detail, context, "api request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            context: context.to_string(),
            source,
        })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, context).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failure.
    pub async fn dashboard(&self) -> Result<DashboardResponse, ClientError> {
        let request = self.request(Method::GET, "api/dashboard")?;
        self.send(request, "dashboard").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Server`] with status 404 for an unknown campaign.
    pub async fn campaign_dashboard(
        &self,
        campaign_id: i64,
    ) -> Result<CampaignDashboardResponse, ClientError> {
        let request = self.request(Method::GET, &format!("api/campaigns/{campaign_id}/dashboard"))?;
        self.send(request, "campaign dashboard").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failure.
    pub async fn add_post(&self, body: &AddPostRequest) -> Result<AddPostResponse, ClientError> {
        self.post_json("api/posts", body, "add post response").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failure.
    pub async fn bulk_add(&self, body: &BulkAddRequest) -> Result<BulkAddResponse, ClientError> {
        self.post_json("api/posts/bulk", body, "bulk add response").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failure.
    pub async fn delete_creator(
        &self,
        creator_id: i64,
    ) -> Result<DeleteCreatorResponse, ClientError> {
        let request = self.request(Method::DELETE, &format!("api/creators/{creator_id}"))?;
        self.send(request, "delete creator response").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failure.
    pub async fn delete_all(&self) -> Result<DeleteAllResponse, ClientError> {
        let request = self.request(Method::DELETE, "api/all-data")?;
        self.send(request, "delete all response").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Server`] with status 403 when manual polling is off.
    pub async fn poll_now(&self, body: &PollRequest) -> Result<PollResponse, ClientError> {
        self.post_json("api/poll-now", body, "poll response").await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Server`] when the secret is rejected or unset server-side.
    pub async fn trigger_daily(&self, cron_secret: &str) -> Result<CronResponse, ClientError> {
        let request = self
            .request(Method::POST, "api/cron/daily")?
            .header("X-Cron-Secret", cron_secret);
        self.send(request, "cron response").await
    }
}
