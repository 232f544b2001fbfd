//! Server-rendered HTML for the dashboard and the campaign share page.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use reeltrack_core::{html, render_campaign, render_dashboard, sort_posts, SortMode};
use reeltrack_db::DbError;
use serde::Deserialize;

use crate::api::{load_campaign_dashboard, load_dashboard, map_db_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

impl SortQuery {
    /// Unknown values fall back to the default order rather than failing the page.
    fn mode(&self) -> SortMode {
        self.sort
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SortQuery>,
) -> Result<Html<String>, ApiError> {
    let data = load_dashboard(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;
    let sort = query.mode();
    let posts = sort_posts(&data.posts, sort);
    let view = render_dashboard(
        data.generated_at.as_deref(),
        &data.totals,
        &data.campaigns,
        &posts,
    );
    Ok(Html(html::dashboard_page(&view, sort)))
}

pub async fn campaign_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(campaign_id): Path<i64>,
    Query(query): Query<SortQuery>,
) -> Result<Html<String>, ApiError> {
    let data = match load_campaign_dashboard(&state.pool, campaign_id).await {
        Ok(data) => data,
        Err(DbError::NotFound) => {
            return Err(ApiError::new(req_id.0, "not_found", "Campaign not found"));
        }
        Err(e) => return Err(map_db_error(req_id.0, &e)),
    };
    let sort = query.mode();
    let posts = sort_posts(&data.posts, sort);
    let view = render_campaign(
        &data.campaign,
        &data.totals,
        &posts,
        data.generated_at.as_deref(),
    );
    Ok(Html(html::campaign_page(&view, sort)))
}
