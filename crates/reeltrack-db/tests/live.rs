//! Live integration tests for reeltrack-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness from `DATABASE_URL`. They are ignored by default; run
//! them with `cargo test -p reeltrack-db -- --ignored` against a database.

use reeltrack_core::parse_bulk_rows;
use reeltrack_db::{
    create_post, delete_all_data, delete_creator, get_active_post_url, get_campaign,
    insert_bulk_entries, list_active_post_ids, list_dashboard_posts, list_snapshots,
    record_poll_result, DbError, NewCreator, NewPost, SnapshotInput,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_post<'a>(campaign: &'a str, handle: &'a str, url: &'a str) -> NewPost<'a> {
    NewPost {
        campaign_name: campaign,
        creator: NewCreator {
            handle,
            ..NewCreator::default()
        },
        post_url: url,
        shortcode: None,
    }
}

fn ok_snapshot(views: i64) -> SnapshotInput {
    SnapshotInput {
        views: Some(views),
        likes: Some(views / 10),
        comments: Some(1),
        source_status: "ok:apify".to_string(),
        source_error: None,
    }
}

fn error_snapshot(message: &str) -> SnapshotInput {
    SnapshotInput {
        source_status: "error".to_string(),
        source_error: Some(message.to_string()),
        ..SnapshotInput::default()
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn create_post_appends_scheduled_snapshot(pool: sqlx::PgPool) {
    let post_id = create_post(
        &pool,
        &new_post("Spring", "@alice", "https://www.instagram.com/reel/AAA"),
    )
    .await
    .expect("create_post failed");

    let snapshots = list_snapshots(&pool, post_id).await.expect("snapshots");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].source_status, "scheduled");
    assert!(snapshots[0].views.is_none());

    let rows = list_dashboard_posts(&pool, None).await.expect("dashboard");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].creator_handle, "alice");
    assert_eq!(rows[0].source_status.as_deref(), Some("scheduled"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn duplicate_post_url_is_rejected_without_side_effects(pool: sqlx::PgPool) {
    let url = "https://www.instagram.com/reel/DUP";
    create_post(&pool, &new_post("Spring", "alice", url))
        .await
        .expect("first insert");

    let err = create_post(&pool, &new_post("Autumn", "bob", url))
        .await
        .expect_err("second insert should fail");
    assert!(matches!(err, DbError::DuplicatePostUrl(_)));

    let campaigns: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(campaigns, 1, "failed insert must roll back the campaign upsert");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn bulk_insert_reports_duplicates_by_line(pool: sqlx::PgPool) {
    create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/EXISTING"),
    )
    .await
    .expect("seed");

    let sheet = parse_bulk_rows(
        "Name\tProfile Link\tFollowers\tLive Link\n\
         Bob\thttps://instagram.com/bob\t1K\thttps://instagram.com/reel/NEW1\n\
         Al\t\t\thttps://www.instagram.com/reel/EXISTING\n\
         Bob\thttps://instagram.com/bob\t1K\thttps://instagram.com/reel/NEW1",
    )
    .expect("sheet");
    assert_eq!(sheet.entries.len(), 3);

    let outcome = insert_bulk_entries(&pool, "Spring", &sheet.entries)
        .await
        .expect("bulk insert");
    assert_eq!(outcome.inserted_post_ids.len(), 1);
    let lines: Vec<usize> = outcome.duplicates.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert!(outcome
        .duplicates
        .iter()
        .all(|d| d.reason == "Duplicate post URL"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn active_post_lookup(pool: sqlx::PgPool) {
    let post_id = create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/LOOK"),
    )
    .await
    .expect("create");

    assert_eq!(
        list_active_post_ids(&pool).await.expect("ids"),
        vec![post_id]
    );
    assert_eq!(
        get_active_post_url(&pool, post_id).await.expect("url").as_deref(),
        Some("https://www.instagram.com/reel/LOOK")
    );
    assert!(get_active_post_url(&pool, post_id + 1000)
        .await
        .expect("url")
        .is_none());
}

// ---------------------------------------------------------------------------
// Dashboard rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn dashboard_metrics_fall_back_to_last_known_values(pool: sqlx::PgPool) {
    let post_id = create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/FALL"),
    )
    .await
    .expect("create");

    record_poll_result(&pool, post_id, &ok_snapshot(500))
        .await
        .expect("ok poll");
    record_poll_result(&pool, post_id, &error_snapshot("timeout"))
        .await
        .expect("error poll");

    let rows = list_dashboard_posts(&pool, None).await.expect("dashboard");
    let row = &rows[0];
    assert_eq!(row.views, Some(500));
    assert_eq!(row.likes, Some(50));
    assert_eq!(row.source_status.as_deref(), Some("error"));
    assert_eq!(row.source_error.as_deref(), Some("timeout"));
    assert!(row.last_polled_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn dashboard_rows_filter_by_campaign(pool: sqlx::PgPool) {
    create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/S1"),
    )
    .await
    .expect("create");
    create_post(
        &pool,
        &new_post("Autumn", "bob", "https://www.instagram.com/reel/A1"),
    )
    .await
    .expect("create");

    let all = list_dashboard_posts(&pool, None).await.expect("all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].campaign_name, "Autumn");

    let spring_id = all[1].campaign_id;
    let spring = list_dashboard_posts(&pool, Some(spring_id))
        .await
        .expect("spring");
    assert_eq!(spring.len(), 1);
    assert_eq!(
        get_campaign(&pool, spring_id).await.expect("campaign").name,
        "Spring"
    );
    assert!(matches!(
        get_campaign(&pool, spring_id + 1000).await,
        Err(DbError::NotFound)
    ));
}

// ---------------------------------------------------------------------------
// Deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_creator_removes_posts_across_campaigns(pool: sqlx::PgPool) {
    let first = create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/D1"),
    )
    .await
    .expect("create");
    create_post(
        &pool,
        &new_post("Autumn", "alice", "https://www.instagram.com/reel/D2"),
    )
    .await
    .expect("create");
    create_post(
        &pool,
        &new_post("Autumn", "bob", "https://www.instagram.com/reel/D3"),
    )
    .await
    .expect("create");
    record_poll_result(&pool, first, &ok_snapshot(10))
        .await
        .expect("poll");

    let creator_id: i64 = sqlx::query_scalar("SELECT id FROM creators WHERE handle = 'alice'")
        .fetch_one(&pool)
        .await
        .expect("creator id");

    let deletion = delete_creator(&pool, creator_id).await.expect("delete");
    assert_eq!(deletion.creator_handle, "alice");
    assert_eq!(deletion.deleted_posts, 2);
    assert_eq!(deletion.deleted_snapshots, 3);

    let remaining = list_dashboard_posts(&pool, None).await.expect("dashboard");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].creator_handle, "bob");

    assert!(matches!(
        delete_creator(&pool, creator_id).await,
        Err(DbError::NotFound)
    ));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_all_data_reports_counts(pool: sqlx::PgPool) {
    create_post(
        &pool,
        &new_post("Spring", "alice", "https://www.instagram.com/reel/X1"),
    )
    .await
    .expect("create");
    create_post(
        &pool,
        &new_post("Autumn", "bob", "https://www.instagram.com/reel/X2"),
    )
    .await
    .expect("create");

    let counts = delete_all_data(&pool).await.expect("delete all");
    assert_eq!(counts.deleted_campaigns, 2);
    assert_eq!(counts.deleted_creators, 2);
    assert_eq!(counts.deleted_posts, 2);
    assert_eq!(counts.deleted_snapshots, 2);
    assert!(list_dashboard_posts(&pool, None)
        .await
        .expect("dashboard")
        .is_empty());
}
