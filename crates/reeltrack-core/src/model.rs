//! Wire view models for the dashboard API.
//!
//! The server serializes these; the viewing client deserializes them and never
//! mutates them locally. Deserialization is lenient about optional fields so a
//! campaign-scoped post row (which omits campaign fields) decodes into the same
//! [`PostRow`] as a global one.

use serde::{Deserialize, Deserializer, Serialize};

/// Aggregate counters computed by the backend. Never derived client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub campaign_id: i64,
    pub campaign_name: String,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    pub campaign_id: i64,
    pub campaign_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub creator_id: i64,
    pub creator_handle: String,
    pub creator_name: String,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
}

/// One post flattened with its creator and latest snapshot.
///
/// `views`, `likes` and `comments` are `None` until the first successful
/// fetch. `None` is distinct from `Some(0)` all the way to the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRow {
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub creator_id: i64,
    #[serde(default)]
    pub creator_handle: String,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub post_url: String,
    #[serde(default)]
    pub followers_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub views: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub likes: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_metric")]
    pub comments: Option<i64>,
    #[serde(default)]
    pub source_status: Option<String>,
    #[serde(default)]
    pub source_error: Option<String>,
    #[serde(default)]
    pub last_snapshot_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<String>,
}

/// `GET /api/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub campaigns: Vec<CampaignSummary>,
    #[serde(default)]
    pub creators: Vec<CreatorSummary>,
    #[serde(default)]
    pub posts: Vec<PostRow>,
}

/// `GET /api/campaigns/{id}/dashboard`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDashboardResponse {
    #[serde(default)]
    pub generated_at: Option<String>,
    pub campaign: CampaignRef,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub creators: Vec<CreatorSummary>,
    #[serde(default)]
    pub posts: Vec<PostRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPostRequest {
    pub campaign_name: String,
    pub creator_handle: String,
    pub post_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPostResponse {
    #[serde(default)]
    pub ok: bool,
    pub post_id: i64,
}

/// `POST /api/posts/bulk`. `rows` holds tab-separated text with a header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAddRequest {
    pub campaign_name: String,
    #[serde(alias = "bulk_text")]
    pub rows: String,
}

/// A bulk row that was skipped. `line` is 1-based with the header on line 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRowError {
    #[serde(alias = "row")]
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAddResponse {
    #[serde(default)]
    pub ok: bool,
    pub inserted: usize,
    #[serde(default)]
    pub initial_polled: Option<usize>,
    #[serde(default)]
    pub errors: Vec<BulkRowError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAllResponse {
    #[serde(default)]
    pub ok: bool,
    pub deleted_campaigns: u64,
    pub deleted_creators: u64,
    pub deleted_posts: u64,
    pub deleted_snapshots: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCreatorResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub creator_id: Option<i64>,
    pub creator_handle: String,
    pub deleted_posts: u64,
    pub deleted_snapshots: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub ok: bool,
    pub polled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronResponse {
    pub ok: bool,
    pub polled: usize,
    pub ran_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: String,
}

/// Body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Accepts a metric as an integer, a float, a numeric string (commas
/// allowed), an empty string, or `null`. Empty and non-numeric strings decode
/// to `None`.
fn deserialize_metric<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMetric {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<RawMetric>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawMetric::Int(v)) => Some(v),
        #[allow(clippy::cast_possible_truncation)]
        Some(RawMetric::Float(v)) if v.is_finite() => Some(v.trunc() as i64),
        Some(RawMetric::Float(_)) => None,
        Some(RawMetric::Text(s)) => s.trim().replace(',', "").parse::<i64>().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_with_views(views: serde_json::Value) -> PostRow {
        serde_json::from_value(json!({
            "post_id": 1,
            "creator_id": 2,
            "creator_handle": "alice",
            "post_url": "https://www.instagram.com/reel/abc",
            "views": views,
        }))
        .expect("post row")
    }

    #[test]
    fn metric_null_absent_and_empty_string_decode_to_none() {
        assert_eq!(post_with_views(json!(null)).views, None);
        assert_eq!(post_with_views(json!("")).views, None);

        let absent: PostRow = serde_json::from_value(json!({
            "post_id": 1,
            "creator_id": 2,
            "creator_handle": "alice",
            "post_url": "https://www.instagram.com/reel/abc",
        }))
        .expect("post row");
        assert_eq!(absent.views, None);
    }

    #[test]
    fn metric_zero_stays_zero() {
        assert_eq!(post_with_views(json!(0)).views, Some(0));
        assert_eq!(post_with_views(json!("0")).views, Some(0));
    }

    #[test]
    fn metric_numeric_strings_and_floats_decode() {
        assert_eq!(post_with_views(json!("1,234")).views, Some(1234));
        assert_eq!(post_with_views(json!(12.0)).views, Some(12));
        assert_eq!(post_with_views(json!("n/a")).views, None);
    }

    #[test]
    fn campaign_scoped_post_row_omits_campaign_fields() {
        let row = post_with_views(json!(5));
        let value = serde_json::to_value(&row).expect("serialize");
        assert!(value.get("campaign_id").is_none());
        assert!(value.get("campaign_name").is_none());
        assert_eq!(value["views"], json!(5));
    }

    #[test]
    fn bulk_row_error_accepts_row_alias() {
        let resp: BulkAddResponse = serde_json::from_value(json!({
            "inserted": 3,
            "errors": [{"row": 2, "reason": "dup"}]
        }))
        .expect("bulk response");
        assert_eq!(resp.inserted, 3);
        assert_eq!(resp.initial_polled, None);
        assert_eq!(resp.errors[0].line, 2);
        assert_eq!(resp.errors[0].reason, "dup");
    }

    #[test]
    fn bulk_request_accepts_bulk_text_alias() {
        let req: BulkAddRequest = serde_json::from_value(json!({
            "campaign_name": "Spring",
            "bulk_text": "Name\tProfile Link\tFollowers\tLive Link"
        }))
        .expect("bulk request");
        assert!(req.rows.starts_with("Name"));
    }

    #[test]
    fn poll_request_omits_absent_post_id() {
        let body = serde_json::to_string(&PollRequest::default()).expect("serialize");
        assert_eq!(body, "{}");
    }
}
