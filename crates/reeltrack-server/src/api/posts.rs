//! Post intake: single add and tab-separated bulk add.

use axum::{extract::State, Extension, Json};
use reeltrack_core::{
    instagram::{normalize_handle, parse_shortcode, validate_post_url},
    parse_bulk_rows, AddPostRequest, AddPostResponse, BulkAddRequest, BulkAddResponse,
};
use reeltrack_db::{DbError, NewCreator, NewPost};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

const MAX_NAME_CHARS: usize = 120;
const MAX_BULK_CHARS: usize = 200_000;

/// Trims `value` and checks its length in characters.
fn bounded_text<'a>(
    req_id: &str,
    field: &str,
    value: &'a str,
    max_chars: usize,
) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if (1..=max_chars).contains(&len) {
        Ok(trimmed)
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must be between 1 and {max_chars} characters"),
        ))
    }
}

pub(super) async fn add_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AddPostRequest>,
) -> Result<Json<AddPostResponse>, ApiError> {
    let campaign_name = bounded_text(&req_id.0, "campaign_name", &body.campaign_name, MAX_NAME_CHARS)?;
    let handle = normalize_handle(&body.creator_handle);
    let handle = bounded_text(&req_id.0, "creator_handle", &handle, MAX_NAME_CHARS)?;
    let post_url = validate_post_url(&body.post_url)
        .map_err(|e| ApiError::new(req_id.0.as_str(), "validation_error", e.to_string()))?;
    let shortcode = parse_shortcode(&post_url);

    let new_post = NewPost {
        campaign_name,
        creator: NewCreator {
            handle,
            display_name: body.creator_name.as_deref(),
            profile_url: None,
            followers_text: body.followers_text.as_deref(),
        },
        post_url: &post_url,
        shortcode: shortcode.as_deref(),
    };

    match reeltrack_db::create_post(&state.pool, &new_post).await {
        Ok(post_id) => {
            tracing::info!(post_id, campaign = campaign_name, creator = handle, "post added");
            Ok(Json(AddPostResponse { ok: true, post_id }))
        }
        Err(DbError::DuplicatePostUrl(_)) => Err(ApiError::new(
            req_id.0,
            "conflict",
            "Post URL already exists",
        )),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

/// Inserts every valid row, then polls the new posts once so they show
/// numbers before the next daily run.
pub(super) async fn bulk_add_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BulkAddRequest>,
) -> Result<Json<BulkAddResponse>, ApiError> {
    let campaign_name = bounded_text(&req_id.0, "campaign_name", &body.campaign_name, MAX_NAME_CHARS)?;
    if body.rows.chars().count() > MAX_BULK_CHARS {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("rows must be at most {MAX_BULK_CHARS} characters"),
        ));
    }

    let sheet = parse_bulk_rows(&body.rows)
        .map_err(|e| ApiError::new(req_id.0.as_str(), "bad_request", e.to_string()))?;

    let outcome = reeltrack_db::insert_bulk_entries(&state.pool, campaign_name, &sheet.entries)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut errors = sheet.errors;
    errors.extend(outcome.duplicates);
    errors.sort_by_key(|e| e.line);

    let inserted = outcome.inserted_post_ids.len();
    let initial_polled = if inserted > 0 {
        state.poller.poll_posts(&outcome.inserted_post_ids).await
    } else {
        0
    };

    tracing::info!(
        campaign = campaign_name,
        inserted,
        skipped = errors.len(),
        initial_polled,
        "bulk add complete"
    );

    Ok(Json(BulkAddResponse {
        ok: true,
        inserted,
        initial_polled: Some(initial_polled),
        errors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_text_trims_and_checks_length() {
        assert_eq!(bounded_text("r", "campaign_name", "  Launch ", 120).ok(), Some("Launch"));
        assert!(bounded_text("r", "campaign_name", "   ", 120).is_err());
        let long = "x".repeat(121);
        assert!(bounded_text("r", "campaign_name", &long, 120).is_err());
        let exact = "é".repeat(120);
        assert!(bounded_text("r", "campaign_name", &exact, 120).is_ok());
    }
}
