use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("APIFY_TOKEN is not set")]
    MissingToken,

    #[error("invalid provider base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Apify actor call failed: HTTP {status} {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Apify actor returned no items")]
    EmptyDataset,

    #[error("Apify response missing views/likes/comments fields")]
    MissingMetrics,

    /// Every attempt failed. `summary` lists the first few attempt errors.
    #[error("{summary}")]
    Exhausted { attempts: u32, summary: String },
}
