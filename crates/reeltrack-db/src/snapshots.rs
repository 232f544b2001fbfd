//! Metric snapshots. Snapshots are append-only; the newest one per post is
//! what the dashboard shows.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

pub const STATUS_SCHEDULED: &str = "scheduled";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotRow {
    pub id: i64,
    pub post_id: i64,
    pub fetched_at: DateTime<Utc>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub views: Option<i64>,
    pub source_status: String,
    pub source_error: Option<String>,
}

/// Outcome of one fetch attempt for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotInput {
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub source_status: String,
    pub source_error: Option<String>,
}

pub(crate) async fn insert_scheduled_snapshot(
    conn: &mut PgConnection,
    post_id: i64,
) -> Result<(), DbError> {
    sqlx::query("INSERT INTO snapshots (post_id, source_status) VALUES ($1, $2)")
        .bind(post_id)
        .bind(STATUS_SCHEDULED)
        .execute(conn)
        .await?;
    Ok(())
}

/// Appends a snapshot for `post_id` and stamps the post's `last_polled_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails; neither is applied.
pub async fn record_poll_result(
    pool: &PgPool,
    post_id: i64,
    snapshot: &SnapshotInput,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let fetched_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        "INSERT INTO snapshots (post_id, likes, comments, views, source_status, source_error) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING fetched_at",
    )
    .bind(post_id)
    .bind(snapshot.likes)
    .bind(snapshot.comments)
    .bind(snapshot.views)
    .bind(&snapshot.source_status)
    .bind(snapshot.source_error.as_deref())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE posts SET last_polled_at = $1 WHERE id = $2")
        .bind(fetched_at)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// All snapshots of a post, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_snapshots(pool: &PgPool, post_id: i64) -> Result<Vec<SnapshotRow>, DbError> {
    let rows = sqlx::query_as::<_, SnapshotRow>(
        "SELECT id, post_id, fetched_at, likes, comments, views, source_status, source_error \
         FROM snapshots \
         WHERE post_id = $1 \
         ORDER BY fetched_at DESC, id DESC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
