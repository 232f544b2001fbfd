use super::*;
use serde_json::json;

fn client(base_url: &str) -> ApifyClient {
    ApifyClient::with_base_url(Some("tok"), "apify/instagram-reel-scraper", 5, base_url)
        .expect("client")
}

#[test]
fn endpoint_replaces_actor_slash_with_tilde() {
    let url = client("https://api.apify.com").endpoint().expect("endpoint");
    assert_eq!(
        url.as_str(),
        "https://api.apify.com/v2/acts/apify~instagram-reel-scraper/run-sync-get-dataset-items"
    );
}

#[test]
fn endpoint_keeps_base_path_prefix() {
    let url = client("http://localhost:9000/proxy/").endpoint().expect("endpoint");
    assert!(url.as_str().starts_with("http://localhost:9000/proxy/v2/acts/"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ApifyClient::with_base_url(Some("tok"), "a/b", 5, "not a url");
    assert!(matches!(result, Err(ScraperError::InvalidBaseUrl { .. })));
}

#[test]
fn blank_token_counts_as_missing() {
    let c = ApifyClient::with_base_url(Some("  "), "a/b", 5, "https://api.apify.com")
        .expect("client");
    assert!(c.token.is_none());
}

#[test]
fn extract_metrics_reads_reel_item() {
    let item = json!({
        "videoPlayCount": 12_000,
        "likesCount": "1.2k",
        "comments": [{"text": "nice"}]
    });
    assert_eq!(
        extract_metrics(&item),
        PostMetrics {
            views: Some(12_000),
            likes: Some(1_200),
            comments: Some(1)
        }
    );
}

#[test]
fn extract_metrics_ignores_non_objects() {
    assert_eq!(extract_metrics(&json!("oops")), PostMetrics::default());
}

#[test]
fn with_retry_floors_attempts_at_one() {
    let c = client("https://api.apify.com").with_retry(0, Duration::ZERO);
    assert_eq!(c.max_attempts, 1);
}
