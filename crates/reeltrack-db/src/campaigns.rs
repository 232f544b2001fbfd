use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Returns the id of the campaign named `name`, creating it when absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_campaign(conn: &mut PgConnection, name: &str) -> Result<i64, DbError> {
    // DO UPDATE rather than DO NOTHING so RETURNING yields the existing row.
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO campaigns (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
    )
    .bind(name.trim())
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Fetches a campaign by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no campaign has this id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_campaign(pool: &PgPool, id: i64) -> Result<CampaignRow, DbError> {
    sqlx::query_as::<_, CampaignRow>("SELECT id, name, created_at FROM campaigns WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}
