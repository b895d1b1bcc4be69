//! Tests for the `SQLite` snapshot store.

use diesel::Connection;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::SqliteCacheStore;
use crate::model::test_support::{closed_pull_request, comment, pull_request, review};
use crate::model::ReviewState;
use crate::persistence::{CacheStore, PersistenceError, migrate_database};
use crate::telemetry::NoopTelemetrySink;

#[fixture]
fn temp_db() -> (TempDir, String) {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let db_path = temp_dir.path().join("repowatch.sqlite");
    (temp_dir, db_path.to_string_lossy().into_owned())
}

#[fixture]
fn migrated_store(temp_db: (TempDir, String)) -> (TempDir, SqliteCacheStore) {
    let (temp_dir, database_url) = temp_db;
    migrate_database(&database_url, &NoopTelemetrySink).expect("migrations should run");
    let store = SqliteCacheStore::new(database_url).expect("store should build");
    (temp_dir, store)
}

#[rstest]
#[tokio::test]
async fn save_then_load_round_trips_in_number_order(migrated_store: (TempDir, SqliteCacheStore)) {
    let (_temp_dir, store) = migrated_store;
    let mut later = pull_request(12);
    later.review_comments.push(review(1, "", "alice", ReviewState::Approved));
    later.diff_comments.push(comment(2, "nit", "bob"));
    later.is_fully_interrogated = true;
    let earlier = closed_pull_request(3, 48);

    store
        .save(&[later.clone(), earlier.clone()], "octo", "repo")
        .await
        .expect("save should succeed");
    let loaded = store.load("octo", "repo").await.expect("load should succeed");

    assert_eq!(loaded, vec![earlier, later]);
}

#[rstest]
#[tokio::test]
async fn save_replaces_rows_for_the_repository_only(migrated_store: (TempDir, SqliteCacheStore)) {
    let (_temp_dir, store) = migrated_store;

    store
        .save(&[pull_request(1), pull_request(2)], "octo", "repo")
        .await
        .expect("save should succeed");
    store
        .save(&[pull_request(5)], "octo", "other")
        .await
        .expect("save should succeed");
    store
        .save(&[pull_request(2)], "octo", "repo")
        .await
        .expect("save should succeed");

    let repo: Vec<u64> = store
        .load("octo", "repo")
        .await
        .expect("load should succeed")
        .iter()
        .map(|pr| pr.number)
        .collect();
    let other: Vec<u64> = store
        .load("octo", "other")
        .await
        .expect("load should succeed")
        .iter()
        .map(|pr| pr.number)
        .collect();

    assert_eq!(repo, vec![2]);
    assert_eq!(other, vec![5]);
}

#[rstest]
#[tokio::test]
async fn empty_saved_snapshot_is_not_missing(migrated_store: (TempDir, SqliteCacheStore)) {
    let (_temp_dir, store) = migrated_store;

    store
        .save(&[], "octo", "repo")
        .await
        .expect("save should succeed");

    assert_eq!(store.load("octo", "repo").await, Ok(Vec::new()));
}

#[rstest]
#[tokio::test]
async fn load_without_snapshot_reports_not_found(migrated_store: (TempDir, SqliteCacheStore)) {
    let (_temp_dir, store) = migrated_store;

    let error = store
        .load("octo", "repo")
        .await
        .expect_err("load should fail");

    assert!(
        matches!(error, PersistenceError::SnapshotNotFound { .. }),
        "expected SnapshotNotFound, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn unmigrated_database_reports_missing_schema(temp_db: (TempDir, String)) {
    let (_temp_dir, database_url) = temp_db;
    let store = SqliteCacheStore::new(database_url).expect("store should build");

    let load_error = store
        .load("octo", "repo")
        .await
        .expect_err("load should fail");
    let save_error = store
        .save(&[pull_request(1)], "octo", "repo")
        .await
        .expect_err("save should fail");

    assert_eq!(load_error, PersistenceError::SchemaNotInitialised);
    assert_eq!(save_error, PersistenceError::SchemaNotInitialised);
}

#[rstest]
#[tokio::test]
async fn malformed_schema_reports_query_failure(temp_db: (TempDir, String)) {
    let (_temp_dir, database_url) = temp_db;
    let mut connection =
        SqliteConnection::establish(&database_url).expect("connection should succeed");
    sql_query("CREATE TABLE pull_request_snapshots (id INTEGER PRIMARY KEY);")
        .execute(&mut connection)
        .expect("table should be created");
    sql_query("CREATE TABLE repository_snapshots (owner TEXT, repo TEXT);")
        .execute(&mut connection)
        .expect("table should be created");
    let store = SqliteCacheStore::new(database_url).expect("store should build");

    let error = store
        .load("octo", "repo")
        .await
        .expect_err("malformed schema should fail");

    assert!(
        matches!(error, PersistenceError::QueryFailed { .. }),
        "expected QueryFailed, got {error:?}"
    );
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  ")]
fn blank_database_urls_are_rejected(#[case] url: &str) {
    assert_eq!(
        SqliteCacheStore::new(url),
        Err(PersistenceError::BlankDatabaseUrl)
    );
}
