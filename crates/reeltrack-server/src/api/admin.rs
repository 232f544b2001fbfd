//! Destructive endpoints. Confirmation happens client-side.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use reeltrack_core::{DeleteAllResponse, DeleteCreatorResponse};
use reeltrack_db::DbError;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

pub(super) async fn delete_creator(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(creator_id): Path<i64>,
) -> Result<Json<DeleteCreatorResponse>, ApiError> {
    match reeltrack_db::delete_creator(&state.pool, creator_id).await {
        Ok(deleted) => Ok(Json(DeleteCreatorResponse {
            ok: true,
            creator_id: Some(deleted.creator_id),
            creator_handle: deleted.creator_handle,
            deleted_posts: deleted.deleted_posts,
            deleted_snapshots: deleted.deleted_snapshots,
        })),
        Err(DbError::NotFound) => Err(ApiError::new(req_id.0, "not_found", "Creator not found")),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

pub(super) async fn delete_all_data(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<DeleteAllResponse>, ApiError> {
    let deleted = reeltrack_db::delete_all_data(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;

    Ok(Json(DeleteAllResponse {
        ok: true,
        deleted_campaigns: deleted.deleted_campaigns,
        deleted_creators: deleted.deleted_creators,
        deleted_posts: deleted.deleted_posts,
        deleted_snapshots: deleted.deleted_snapshots,
    }))
}
