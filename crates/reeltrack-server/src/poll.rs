//! Poll orchestration: fetch fresh metrics for posts and append snapshots.
//!
//! Post ids are walked in batches; inside a batch at most `concurrency`
//! provider calls run at once. A failed fetch still appends a snapshot, with
//! status `error` and the provider message, so the dashboard shows why the
//! numbers are stale.

use futures::stream::{self, StreamExt};
use reeltrack_core::AppConfig;
use reeltrack_db::{DbError, SnapshotInput};
use reeltrack_scraper::{ApifyClient, PostMetrics, ScraperError, PROVIDER};
use sqlx::PgPool;

const STATUS_ERROR: &str = "error";

pub struct Poller {
    pool: PgPool,
    scraper: ApifyClient,
    batch_size: usize,
    concurrency: usize,
}

impl Poller {
    #[must_use]
    pub fn new(pool: PgPool, scraper: ApifyClient, config: &AppConfig) -> Self {
        Self {
            pool,
            scraper,
            batch_size: config.poll_batch_size.max(1),
            concurrency: config.poll_concurrency(),
        }
    }

    /// Polls one post. Returns `false` when the post does not exist or is inactive.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the post lookup or the snapshot write fails.
    /// Provider failures are recorded, not returned.
    pub async fn poll_post(&self, post_id: i64) -> Result<bool, DbError> {
        let Some(post_url) = reeltrack_db::get_active_post_url(&self.pool, post_id).await? else {
            return Ok(false);
        };

        let fetched = self.scraper.fetch_metrics(&post_url).await;
        if let Err(e) = &fetched {
            tracing::warn!(post_id, error = %e, "metrics fetch failed");
        }
        let snapshot = snapshot_from_fetch(fetched);
        reeltrack_db::record_poll_result(&self.pool, post_id, &snapshot).await?;

        tracing::debug!(post_id, status = %snapshot.source_status, "post polled");
        Ok(true)
    }

    /// Polls `post_ids` batch by batch. Returns how many posts were attempted.
    ///
    /// Per-post database failures are logged and do not stop the run.
    pub async fn poll_posts(&self, post_ids: &[i64]) -> usize {
        for batch in post_ids.chunks(self.batch_size) {
            stream::iter(batch.iter().copied())
                .map(|post_id| async move { (post_id, self.poll_post(post_id).await) })
                .buffer_unordered(self.concurrency)
                .for_each(|(post_id, result)| async move {
                    if let Err(e) = result {
                        tracing::error!(post_id, error = %e, "failed to record poll result");
                    }
                })
                .await;
        }
        post_ids.len()
    }

    /// Polls every active post.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the active post list cannot be loaded.
    pub async fn poll_all_active(&self) -> Result<usize, DbError> {
        let post_ids = reeltrack_db::list_active_post_ids(&self.pool).await?;
        tracing::info!(
            posts = post_ids.len(),
            batch_size = self.batch_size,
            concurrency = self.concurrency,
            "polling active posts"
        );
        Ok(self.poll_posts(&post_ids).await)
    }
}

/// Maps a provider result onto the snapshot row that records it.
fn snapshot_from_fetch(fetched: Result<PostMetrics, ScraperError>) -> SnapshotInput {
    match fetched {
        Ok(metrics) => SnapshotInput {
            views: metrics.views,
            likes: metrics.likes,
            comments: metrics.comments,
            source_status: format!("ok:{PROVIDER}"),
            source_error: None,
        },
        Err(e) => SnapshotInput {
            source_status: STATUS_ERROR.to_string(),
            source_error: Some(e.to_string()),
            ..SnapshotInput::default()
        },
    }
}
