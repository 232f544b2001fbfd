use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Header carrying the shared secret for `/api/cron/daily`.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Outcome of checking the cron secret header against the configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronAuth {
    Allowed,
    /// No `CRON_SECRET` is configured, so the endpoint is off.
    NotConfigured,
    Rejected,
}

/// Compares the `X-Cron-Secret` header with `expected` in constant time.
pub fn check_cron_secret(expected: Option<&str>, headers: &HeaderMap) -> CronAuth {
    let Some(expected) = expected.filter(|s| !s.is_empty()) else {
        return CronAuth::NotConfigured;
    };
    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        CronAuth::Allowed
    } else {
        CronAuth::Rejected
    }
}
