//! Flattened post rows for the dashboard views.

use chrono::{DateTime, Utc};
use reeltrack_core::PostRow;
use sqlx::PgPool;

use crate::DbError;

const DEFAULT_SOURCE_STATUS: &str = "pending";

/// One active post joined with its campaign, creator and latest snapshot.
///
/// Each metric falls back to the most recent non-null value for that metric
/// when the latest snapshot has none, so a failed poll does not blank out
/// previously fetched numbers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardPostRow {
    pub post_id: i64,
    pub post_url: String,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub campaign_id: i64,
    pub campaign_name: String,
    pub creator_id: i64,
    pub creator_handle: String,
    pub creator_name: Option<String>,
    pub followers_text: Option<String>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub source_status: Option<String>,
    pub source_error: Option<String>,
    pub last_snapshot_at: Option<DateTime<Utc>>,
}

impl DashboardPostRow {
    /// Converts to the wire row. Campaign fields are dropped for
    /// campaign-scoped responses.
    #[must_use]
    pub fn into_post_row(self, include_campaign: bool) -> PostRow {
        let creator_name = self
            .creator_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.creator_handle.clone());
        PostRow {
            post_id: self.post_id,
            creator_id: self.creator_id,
            creator_handle: self.creator_handle,
            creator_name: Some(creator_name),
            campaign_id: include_campaign.then_some(self.campaign_id),
            campaign_name: include_campaign.then_some(self.campaign_name),
            post_url: self.post_url,
            followers_text: self.followers_text,
            views: self.views,
            likes: self.likes,
            comments: self.comments,
            source_status: Some(
                self.source_status
                    .unwrap_or_else(|| DEFAULT_SOURCE_STATUS.to_string()),
            ),
            source_error: self.source_error,
            last_snapshot_at: self.last_snapshot_at.map(|t| t.to_rfc3339()),
            last_polled_at: self.last_polled_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Active posts, optionally limited to one campaign, ordered by campaign
/// name, creator handle and post id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_dashboard_posts(
    pool: &PgPool,
    campaign_id: Option<i64>,
) -> Result<Vec<DashboardPostRow>, DbError> {
    let rows = sqlx::query_as::<_, DashboardPostRow>(
        "SELECT \
             p.id AS post_id, \
             p.post_url, \
             p.last_polled_at, \
             c.id AS campaign_id, \
             c.name AS campaign_name, \
             cr.id AS creator_id, \
             cr.handle AS creator_handle, \
             cr.display_name AS creator_name, \
             cr.followers_text, \
             COALESCE(s.views, ( \
                 SELECT s3.views FROM snapshots s3 \
                 WHERE s3.post_id = p.id AND s3.views IS NOT NULL \
                 ORDER BY s3.fetched_at DESC, s3.id DESC LIMIT 1)) AS views, \
             COALESCE(s.likes, ( \
                 SELECT s3.likes FROM snapshots s3 \
                 WHERE s3.post_id = p.id AND s3.likes IS NOT NULL \
                 ORDER BY s3.fetched_at DESC, s3.id DESC LIMIT 1)) AS likes, \
             COALESCE(s.comments, ( \
                 SELECT s3.comments FROM snapshots s3 \
                 WHERE s3.post_id = p.id AND s3.comments IS NOT NULL \
                 ORDER BY s3.fetched_at DESC, s3.id DESC LIMIT 1)) AS comments, \
             s.source_status, \
             s.source_error, \
             s.fetched_at AS last_snapshot_at \
         FROM posts p \
         JOIN campaigns c ON c.id = p.campaign_id \
         JOIN creators cr ON cr.id = p.creator_id \
         LEFT JOIN LATERAL ( \
             SELECT s2.views, s2.likes, s2.comments, s2.source_status, s2.source_error, s2.fetched_at \
             FROM snapshots s2 \
             WHERE s2.post_id = p.id \
             ORDER BY s2.fetched_at DESC, s2.id DESC \
             LIMIT 1 \
         ) s ON TRUE \
         WHERE p.active \
           AND ($1::BIGINT IS NULL OR p.campaign_id = $1) \
         ORDER BY c.name ASC, cr.handle ASC, p.id ASC",
    )
    .bind(campaign_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> DashboardPostRow {
        DashboardPostRow {
            post_id: 1,
            post_url: "https://www.instagram.com/reel/abc".to_string(),
            last_polled_at: None,
            campaign_id: 3,
            campaign_name: "Spring".to_string(),
            creator_id: 4,
            creator_handle: "alice".to_string(),
            creator_name: None,
            followers_text: None,
            views: None,
            likes: Some(0),
            comments: None,
            source_status: None,
            source_error: None,
            last_snapshot_at: None,
        }
    }

    #[test]
    fn missing_snapshot_defaults_to_pending_and_handle_name() {
        let post = row().into_post_row(true);
        assert_eq!(post.source_status.as_deref(), Some("pending"));
        assert_eq!(post.creator_name.as_deref(), Some("alice"));
        assert_eq!(post.campaign_id, Some(3));
        assert_eq!(post.views, None);
        assert_eq!(post.likes, Some(0));
    }

    #[test]
    fn campaign_scoped_rows_drop_campaign_fields() {
        let post = row().into_post_row(false);
        assert_eq!(post.campaign_id, None);
        assert_eq!(post.campaign_name, None);
    }
}
