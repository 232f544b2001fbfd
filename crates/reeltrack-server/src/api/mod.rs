mod admin;
mod dashboard;
mod polling;
mod posts;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{SecondsFormat, Utc};
use reeltrack_core::{AppConfig, ErrorDetail, HealthResponse};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, CRON_SECRET_HEADER};
use crate::pages;
use crate::poll::Poller;

pub(crate) use dashboard::{load_campaign_dashboard, load_dashboard};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub poller: Arc<Poller>,
}

/// Error returned by every handler. Serializes as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub request_id: String,
    pub code: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            code: code.into(),
            detail: detail.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        tracing::debug!(
            request_id = %self.request_id,
            code = %self.code,
            status = status.as_u16(),
            "request failed"
        );
        (status, Json(ErrorDetail { detail: self.detail })).into_response()
    }
}

pub(crate) fn map_db_error(request_id: String, error: &reeltrack_db::DbError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// UTC timestamp in the `2024-05-01T09:00:00+00:00` shape used on the wire.
pub(crate) fn utc_now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static(CRON_SECRET_HEADER),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route(
            "/api/campaigns/{campaign_id}/dashboard",
            get(dashboard::get_campaign_dashboard),
        )
        .route("/api/posts", post(posts::add_post))
        .route("/api/posts/bulk", post(posts::bulk_add_posts))
        .route("/api/poll-now", post(polling::poll_now))
        .route("/api/cron/daily", post(polling::cron_daily))
        .route("/api/creators/{creator_id}", delete(admin::delete_creator))
        .route("/api/all-data", delete(admin::delete_all_data))
}

fn page_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::dashboard_page))
        .route("/campaign/{campaign_id}", get(pages::campaign_page))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api_router())
        .merge(page_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match reeltrack_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                time: utc_now_iso(),
            }),
        ),
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    ok: false,
                    time: utc_now_iso(),
                }),
            )
        }
    }
}
