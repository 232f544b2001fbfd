//! Destructive operations. Both run in a single transaction and report how
//! many rows each table lost.

use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorDeletion {
    pub creator_id: i64,
    pub creator_handle: String,
    pub deleted_posts: u64,
    pub deleted_snapshots: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllDataDeletion {
    pub deleted_campaigns: u64,
    pub deleted_creators: u64,
    pub deleted_posts: u64,
    pub deleted_snapshots: u64,
}

/// Deletes a creator with every post and snapshot they own, across all campaigns.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no creator has this id, or
/// [`DbError::Sqlx`] if any statement fails.
pub async fn delete_creator(pool: &PgPool, creator_id: i64) -> Result<CreatorDeletion, DbError> {
    let mut tx = pool.begin().await?;

    let creator_handle =
        sqlx::query_scalar::<_, String>("SELECT handle FROM creators WHERE id = $1 FOR UPDATE")
            .bind(creator_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

    let deleted_snapshots = sqlx::query(
        "DELETE FROM snapshots WHERE post_id IN (SELECT id FROM posts WHERE creator_id = $1)",
    )
    .bind(creator_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let deleted_posts = sqlx::query("DELETE FROM posts WHERE creator_id = $1")
        .bind(creator_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM creators WHERE id = $1")
        .bind(creator_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(
        creator_id,
        creator_handle = %creator_handle,
        deleted_posts,
        deleted_snapshots,
        "creator deleted"
    );

    Ok(CreatorDeletion {
        creator_id,
        creator_handle,
        deleted_posts,
        deleted_snapshots,
    })
}

/// Deletes every campaign, creator, post and snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is deleted.
pub async fn delete_all_data(pool: &PgPool) -> Result<AllDataDeletion, DbError> {
    let mut tx = pool.begin().await?;

    let deleted_snapshots = sqlx::query("DELETE FROM snapshots")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let deleted_posts = sqlx::query("DELETE FROM posts")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let deleted_creators = sqlx::query("DELETE FROM creators")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let deleted_campaigns = sqlx::query("DELETE FROM campaigns")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    tracing::warn!(
        deleted_campaigns,
        deleted_creators,
        deleted_posts,
        deleted_snapshots,
        "all data deleted"
    );

    Ok(AllDataDeletion {
        deleted_campaigns,
        deleted_creators,
        deleted_posts,
        deleted_snapshots,
    })
}
