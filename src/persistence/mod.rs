//! Snapshot persistence and database migrations.
//!
//! A repository manager persists its complete pull request collection through
//! a [`CacheStore`]. Two stores ship with the crate: a JSON file per
//! repository ([`FilesystemCacheStore`]) and a local `SQLite` database
//! ([`SqliteCacheStore`]) whose schema is managed with Diesel migrations.

mod error;
mod filesystem;
mod migrator;
mod sqlite;

pub use error::PersistenceError;
pub use filesystem::FilesystemCacheStore;
pub use migrator::{
    CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION, SchemaVersion, migrate_database,
};
pub use sqlite::SqliteCacheStore;

use async_trait::async_trait;

use crate::model::PullRequest;

/// Durable storage for a repository's pull request snapshot.
///
/// `load` after `save` returns a list equal field-for-field to what was saved,
/// ordered by ascending pull request number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Replaces any previously saved snapshot for `owner/name`.
    async fn save(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError>;

    /// Loads the saved snapshot for `owner/name`.
    ///
    /// Fails with [`PersistenceError::SnapshotNotFound`] when nothing has
    /// been saved yet.
    async fn load(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError>;
}

/// Runs blocking store work off the async executor.
async fn run_blocking<T, F>(operation: &'static str, work: F) -> Result<T, PersistenceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PersistenceError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| PersistenceError::WriteFailed {
            message: format!("{operation} task failed: {error}"),
        })?
}
