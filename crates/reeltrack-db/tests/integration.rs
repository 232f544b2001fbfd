//! Offline tests for reeltrack-db pool configuration and row types.
//! These tests do not require a live database connection.

use reeltrack_core::{AppConfig, Environment};
use reeltrack_db::{AllDataDeletion, DbError, PoolConfig, SnapshotInput};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        daily_run_hour: 9,
        enable_internal_scheduler: false,
        manual_poll_enabled: true,
        cron_secret: None,
        apify_token: None,
        apify_actor_id: "apify/instagram-reel-scraper".to_string(),
        apify_base_url: "https://api.apify.com".to_string(),
        apify_timeout_secs: 120,
        apify_max_concurrent_runs: 1,
        poll_batch_size: 5,
        fetch_retry_count: 2,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn duplicate_post_url_error_names_the_url() {
    let err = DbError::DuplicatePostUrl("https://www.instagram.com/reel/abc".to_string());
    assert!(err.to_string().contains("/reel/abc"));
}

#[test]
fn snapshot_input_defaults_to_unknown_metrics() {
    let input = SnapshotInput::default();
    assert!(input.views.is_none());
    assert!(input.likes.is_none());
    assert!(input.comments.is_none());
}

#[test]
fn all_data_deletion_defaults_to_zero() {
    let counts = AllDataDeletion::default();
    assert_eq!(counts.deleted_campaigns + counts.deleted_snapshots, 0);
}
