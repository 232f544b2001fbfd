//! Aggregate read endpoints. The HTML pages reuse the loaders here so both
//! surfaces show the same numbers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use reeltrack_core::{rollup, CampaignDashboardResponse, CampaignRef, DashboardResponse, PostRow};
use reeltrack_db::DbError;
use sqlx::PgPool;

use crate::middleware::RequestId;

use super::{map_db_error, utc_now_iso, ApiError, AppState};

pub(crate) async fn load_dashboard(pool: &PgPool) -> Result<DashboardResponse, DbError> {
    let posts: Vec<PostRow> = reeltrack_db::list_dashboard_posts(pool, None)
        .await?
        .into_iter()
        .map(|row| row.into_post_row(true))
        .collect();
    let summary = rollup(&posts);

    Ok(DashboardResponse {
        generated_at: Some(utc_now_iso()),
        totals: summary.totals,
        campaigns: summary.campaigns,
        creators: summary.creators,
        posts,
    })
}

/// # Errors
///
/// Returns [`DbError::NotFound`] when no campaign has this id.
pub(crate) async fn load_campaign_dashboard(
    pool: &PgPool,
    campaign_id: i64,
) -> Result<CampaignDashboardResponse, DbError> {
    let campaign = reeltrack_db::get_campaign(pool, campaign_id).await?;
    let posts: Vec<PostRow> = reeltrack_db::list_dashboard_posts(pool, Some(campaign_id))
        .await?
        .into_iter()
        .map(|row| row.into_post_row(false))
        .collect();
    let summary = rollup(&posts);

    Ok(CampaignDashboardResponse {
        generated_at: Some(utc_now_iso()),
        campaign: CampaignRef {
            campaign_id: campaign.id,
            campaign_name: campaign.name,
        },
        totals: summary.totals,
        creators: summary.creators,
        posts,
    })
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<DashboardResponse>, ApiError> {
    load_dashboard(&state.pool)
        .await
        .map(Json)
        .map_err(|e| map_db_error(req_id.0, &e))
}

pub(super) async fn get_campaign_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(campaign_id): Path<i64>,
) -> Result<Json<CampaignDashboardResponse>, ApiError> {
    match load_campaign_dashboard(&state.pool, campaign_id).await {
        Ok(body) => Ok(Json(body)),
        Err(DbError::NotFound) => Err(ApiError::new(req_id.0, "not_found", "Campaign not found")),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}
