//! Manual and cron-triggered polling.

use axum::{extract::State, http::HeaderMap, Extension, Json};
use reeltrack_core::{CronResponse, PollRequest, PollResponse};

use crate::middleware::{check_cron_secret, CronAuth, RequestId};

use super::{map_db_error, utc_now_iso, ApiError, AppState};

/// `9` -> `9:00 AM`, `14` -> `2:00 PM`.
fn daily_run_label(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:00 {suffix}")
}

pub(super) async fn poll_now(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PollRequest>,
) -> Result<Json<PollResponse>, ApiError> {
    if !state.config.manual_poll_enabled {
        return Err(ApiError::new(
            req_id.0,
            "forbidden",
            format!(
                "Manual polling is disabled. Updates run daily at {}.",
                daily_run_label(state.config.daily_run_hour)
            ),
        ));
    }

    let polled = if let Some(post_id) = body.post_id {
        let found = state
            .poller
            .poll_post(post_id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
        usize::from(found)
    } else {
        state
            .poller
            .poll_all_active()
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    };

    tracing::info!(request_id = %req_id.0, polled, "manual poll complete");
    Ok(Json(PollResponse { ok: true, polled }))
}

pub(super) async fn cron_daily(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<CronResponse>, ApiError> {
    match check_cron_secret(state.config.cron_secret.as_deref(), &headers) {
        CronAuth::Allowed => {}
        CronAuth::NotConfigured => {
            return Err(ApiError::new(
                req_id.0,
                "unavailable",
                "CRON_SECRET not configured",
            ));
        }
        CronAuth::Rejected => {
            tracing::warn!(request_id = %req_id.0, "cron trigger rejected");
            return Err(ApiError::new(req_id.0, "unauthorized", "Invalid cron secret"));
        }
    }

    let polled = state
        .poller
        .poll_all_active()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(CronResponse {
        ok: true,
        polled,
        ran_at: utc_now_iso(),
    }))
}

#[cfg(test)]
mod tests {
    use super::daily_run_label;

    #[test]
    fn daily_run_label_uses_twelve_hour_clock() {
        assert_eq!(daily_run_label(9), "9:00 AM");
        assert_eq!(daily_run_label(0), "12:00 AM");
        assert_eq!(daily_run_label(12), "12:00 PM");
        assert_eq!(daily_run_label(23), "11:00 PM");
    }
}
