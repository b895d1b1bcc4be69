//! Pull request snapshots stored in a local `SQLite` database.
//!
//! Each pull request is a JSON payload row keyed by `(owner, repo, pr_number)`.
//! A companion `repository_snapshots` row records that a snapshot exists at
//! all, so an empty saved collection is distinguishable from "never saved".
//! The schema is created by [`migrate_database`](super::migrate_database).

use async_trait::async_trait;
use diesel::Connection;
use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;
use tracing::debug;

use crate::model::PullRequest;

use super::{CacheStore, PersistenceError, run_blocking};

const SNAPSHOT_TABLE: &str = "pull_request_snapshots";

/// Cache store backed by a migrated `SQLite` database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteCacheStore {
    database_url: String,
}

impl SqliteCacheStore {
    /// Creates a store for the given database URL.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BlankDatabaseUrl`] when the URL is blank.
    pub fn new(database_url: impl Into<String>) -> Result<Self, PersistenceError> {
        let url = database_url.into();
        if url.trim().is_empty() {
            return Err(PersistenceError::BlankDatabaseUrl);
        }
        Ok(Self { database_url: url })
    }

    fn write_snapshot(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        let rows = pull_requests
            .iter()
            .map(|pr| {
                serde_json::to_string(pr)
                    .map(|payload| (number_to_i64(pr.number), payload))
                    .map_err(|error| PersistenceError::Serialisation {
                        message: error.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let count = i64::try_from(rows.len()).unwrap_or(i64::MAX);

        let mut connection = self.establish_connection()?;
        connection
            .transaction::<_, diesel::result::Error, _>(|conn| {
                sql_query(
                    "INSERT INTO repository_snapshots (owner, repo, pull_request_count) \
                     VALUES (?, ?, ?) \
                     ON CONFLICT(owner, repo) DO UPDATE SET \
                       pull_request_count = excluded.pull_request_count, \
                       saved_at = CURRENT_TIMESTAMP;",
                )
                .bind::<Text, _>(owner)
                .bind::<Text, _>(name)
                .bind::<BigInt, _>(count)
                .execute(conn)?;

                sql_query("DELETE FROM pull_request_snapshots WHERE owner = ? AND repo = ?;")
                    .bind::<Text, _>(owner)
                    .bind::<Text, _>(name)
                    .execute(conn)?;

                for (number, payload) in &rows {
                    sql_query(
                        "INSERT INTO pull_request_snapshots (owner, repo, pr_number, payload) \
                         VALUES (?, ?, ?, ?);",
                    )
                    .bind::<Text, _>(owner)
                    .bind::<Text, _>(name)
                    .bind::<BigInt, _>(*number)
                    .bind::<Text, _>(payload.as_str())
                    .execute(conn)?;
                }
                Ok(())
            })
            .map_err(|error| map_write_error(&mut connection, &error))?;

        debug!(repository = %format!("{owner}/{name}"), count = rows.len(), "saved snapshot");
        Ok(())
    }

    fn read_snapshot(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError> {
        #[derive(Debug, QueryableByName)]
        struct MarkerRow {
            #[diesel(sql_type = BigInt)]
            pull_request_count: i64,
        }

        #[derive(Debug, QueryableByName)]
        struct PayloadRow {
            #[diesel(sql_type = Text)]
            payload: String,
        }

        let mut connection = self.establish_connection()?;

        let marker: Option<MarkerRow> = sql_query(
            "SELECT pull_request_count FROM repository_snapshots \
             WHERE owner = ? AND repo = ? LIMIT 1;",
        )
        .bind::<Text, _>(owner)
        .bind::<Text, _>(name)
        .get_result(&mut connection)
        .optional()
        .map_err(|error| map_query_error(&mut connection, &error))?;

        let Some(marker) = marker else {
            return Err(PersistenceError::SnapshotNotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            });
        };

        let rows: Vec<PayloadRow> = sql_query(
            "SELECT payload FROM pull_request_snapshots \
             WHERE owner = ? AND repo = ? ORDER BY pr_number ASC;",
        )
        .bind::<Text, _>(owner)
        .bind::<Text, _>(name)
        .load(&mut connection)
        .map_err(|error| map_query_error(&mut connection, &error))?;

        debug!(
            repository = %format!("{owner}/{name}"),
            recorded = marker.pull_request_count,
            loaded = rows.len(),
            "loaded snapshot"
        );

        rows.into_iter()
            .map(|row| {
                serde_json::from_str(&row.payload).map_err(|error| {
                    PersistenceError::Serialisation {
                        message: error.to_string(),
                    }
                })
            })
            .collect()
    }

    fn establish_connection(&self) -> Result<SqliteConnection, PersistenceError> {
        SqliteConnection::establish(&self.database_url).map_err(|error| {
            PersistenceError::ConnectionFailed {
                message: error.to_string(),
            }
        })
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn save(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        let store = self.clone();
        let snapshot = pull_requests.to_vec();
        let owner_owned = owner.to_owned();
        let name_owned = name.to_owned();
        run_blocking("save snapshot", move || {
            store.write_snapshot(&snapshot, &owner_owned, &name_owned)
        })
        .await
    }

    async fn load(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError> {
        let store = self.clone();
        let owner_owned = owner.to_owned();
        let name_owned = name.to_owned();
        run_blocking("load snapshot", move || {
            store.read_snapshot(&owner_owned, &name_owned)
        })
        .await
    }
}

fn number_to_i64(number: u64) -> i64 {
    i64::try_from(number).unwrap_or(i64::MAX)
}

fn snapshot_table_exists(connection: &mut SqliteConnection) -> Result<bool, diesel::result::Error> {
    #[derive(Debug, QueryableByName)]
    struct Row {
        #[diesel(sql_type = BigInt)]
        one: i64,
    }

    let exists: Option<Row> = sql_query(
        "SELECT 1 AS one FROM sqlite_master WHERE type = 'table' AND name = ? LIMIT 1;",
    )
    .bind::<Text, _>(SNAPSHOT_TABLE)
    .get_result(connection)
    .optional()?;

    Ok(exists.is_some_and(|row| row.one == 1))
}

fn map_error_with_schema_check<F>(
    connection: &mut SqliteConnection,
    error: &diesel::result::Error,
    create_error: F,
) -> PersistenceError
where
    F: Fn(String) -> PersistenceError,
{
    match snapshot_table_exists(connection) {
        Ok(false) => PersistenceError::SchemaNotInitialised,
        Ok(true) => create_error(error.to_string()),
        Err(check_error) => create_error(format!(
            "schema presence check failed: {check_error}; original error: {error}"
        )),
    }
}

fn map_query_error(
    connection: &mut SqliteConnection,
    error: &diesel::result::Error,
) -> PersistenceError {
    map_error_with_schema_check(connection, error, |message| {
        PersistenceError::QueryFailed { message }
    })
}

fn map_write_error(
    connection: &mut SqliteConnection,
    error: &diesel::result::Error,
) -> PersistenceError {
    map_error_with_schema_check(connection, error, |message| {
        PersistenceError::WriteFailed { message }
    })
}

#[cfg(test)]
mod tests;
