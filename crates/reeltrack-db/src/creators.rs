use reeltrack_core::instagram::normalize_handle;
use sqlx::PgConnection;

use crate::DbError;

#[derive(Debug, Clone, Default)]
pub struct NewCreator<'a> {
    pub handle: &'a str,
    pub display_name: Option<&'a str>,
    pub profile_url: Option<&'a str>,
    pub followers_text: Option<&'a str>,
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the id of the creator with this handle, creating it when absent.
///
/// The handle is stored without a leading `@`. Non-empty profile fields
/// overwrite stored ones; empty fields never clear them.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_creator(
    conn: &mut PgConnection,
    creator: &NewCreator<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO creators (handle, display_name, profile_url, followers_text) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (handle) DO UPDATE SET \
             display_name = COALESCE(EXCLUDED.display_name, creators.display_name), \
             profile_url = COALESCE(EXCLUDED.profile_url, creators.profile_url), \
             followers_text = COALESCE(EXCLUDED.followers_text, creators.followers_text) \
         RETURNING id",
    )
    .bind(normalize_handle(creator.handle))
    .bind(blank_to_none(creator.display_name))
    .bind(blank_to_none(creator.profile_url))
    .bind(blank_to_none(creator.followers_text))
    .fetch_one(conn)
    .await?;

    Ok(id)
}
