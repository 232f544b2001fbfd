use reeltrack_core::bulk::{BulkEntry, DUPLICATE_POST_URL};
use reeltrack_core::BulkRowError;
use sqlx::{PgConnection, PgPool};

use crate::creators::{upsert_creator, NewCreator};
use crate::snapshots::insert_scheduled_snapshot;
use crate::{upsert_campaign, DbError};

/// Seconds between scheduled polls of a post.
pub const DEFAULT_POLL_INTERVAL_SEC: i32 = 86_400;

/// A single post to insert, already validated and normalized.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub campaign_name: &'a str,
    pub creator: NewCreator<'a>,
    pub post_url: &'a str,
    pub shortcode: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkInsertOutcome {
    pub inserted_post_ids: Vec<i64>,
    /// Rows rejected because their URL is already tracked.
    pub duplicates: Vec<BulkRowError>,
}

/// Inserts a post unless its URL exists. Returns `None` for a duplicate.
async fn insert_post(
    conn: &mut PgConnection,
    campaign_id: i64,
    creator_id: i64,
    post_url: &str,
    shortcode: Option<&str>,
) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (campaign_id, creator_id, post_url, shortcode, poll_interval_sec) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (post_url) DO NOTHING \
         RETURNING id",
    )
    .bind(campaign_id)
    .bind(creator_id)
    .bind(post_url)
    .bind(shortcode)
    .bind(DEFAULT_POLL_INTERVAL_SEC)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(post_id) = id {
        insert_scheduled_snapshot(conn, post_id).await?;
    }
    Ok(id)
}

/// Creates the campaign and creator if needed, then the post with a
/// `scheduled` snapshot. Returns the new post id.
///
/// # Errors
///
/// Returns [`DbError::DuplicatePostUrl`] if the URL is already tracked, or
/// [`DbError::Sqlx`] if any statement fails. Nothing is written on error.
pub async fn create_post(pool: &PgPool, post: &NewPost<'_>) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let campaign_id = upsert_campaign(&mut tx, post.campaign_name).await?;
    let creator_id = upsert_creator(&mut tx, &post.creator).await?;
    let post_id = insert_post(&mut tx, campaign_id, creator_id, post.post_url, post.shortcode)
        .await?
        .ok_or_else(|| DbError::DuplicatePostUrl(post.post_url.to_string()))?;

    tx.commit().await?;
    Ok(post_id)
}

/// Inserts every parsed bulk row into `campaign_name` in one transaction.
///
/// Rows whose URL already exists (in the database or earlier in the same
/// sheet) are reported in [`BulkInsertOutcome::duplicates`] and skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is written.
pub async fn insert_bulk_entries(
    pool: &PgPool,
    campaign_name: &str,
    entries: &[BulkEntry],
) -> Result<BulkInsertOutcome, DbError> {
    let mut tx = pool.begin().await?;
    let campaign_id = upsert_campaign(&mut tx, campaign_name).await?;

    let mut outcome = BulkInsertOutcome::default();
    for entry in entries {
        let creator = NewCreator {
            handle: &entry.creator_handle,
            display_name: entry.display_name.as_deref(),
            profile_url: entry.profile_url.as_deref(),
            followers_text: entry.followers_text.as_deref(),
        };
        let creator_id = upsert_creator(&mut tx, &creator).await?;
        match insert_post(
            &mut tx,
            campaign_id,
            creator_id,
            &entry.post_url,
            Some(&entry.shortcode),
        )
        .await?
        {
            Some(post_id) => outcome.inserted_post_ids.push(post_id),
            None => outcome.duplicates.push(BulkRowError {
                line: entry.line,
                reason: DUPLICATE_POST_URL.to_string(),
            }),
        }
    }

    tx.commit().await?;
    tracing::debug!(
        campaign = campaign_name,
        inserted = outcome.inserted_post_ids.len(),
        duplicates = outcome.duplicates.len(),
        "bulk entries inserted"
    );
    Ok(outcome)
}

/// Ids of all active posts, ascending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_post_ids(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE active ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// URL of an active post, or `None` if the post is missing or inactive.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_post_url(pool: &PgPool, post_id: i64) -> Result<Option<String>, DbError> {
    let url = sqlx::query_scalar::<_, String>("SELECT post_url FROM posts WHERE id = $1 AND active")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    Ok(url)
}
