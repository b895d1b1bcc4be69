//! Error types for snapshot persistence.

use thiserror::Error;

/// Errors returned while migrating the database or saving and loading
/// pull request snapshots.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// No database URL/path was provided.
    #[error("database URL is required (use --database-url or REPOWATCH_DATABASE_URL)")]
    MissingDatabaseUrl,

    /// The database URL/path was present but blank.
    #[error("database URL must not be blank")]
    BlankDatabaseUrl,

    /// Establishing a `SQLite` connection failed.
    #[error("failed to connect to SQLite database: {message}")]
    ConnectionFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// Running pending migrations failed.
    #[error("failed to run database migrations: {message}")]
    MigrationFailed {
        /// Error detail from Diesel migrations.
        message: String,
    },

    /// Reading the schema version from the migration table failed.
    #[error("failed to read schema version after migrations: {message}")]
    SchemaVersionQueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// The migrations completed but no schema version could be found.
    #[error("no schema version recorded after migrations ran")]
    MissingSchemaVersion,

    /// The snapshot tables are missing; migrations have not been run.
    #[error("snapshot schema is not initialised (run with --migrate-db first)")]
    SchemaNotInitialised,

    /// Nothing has been saved for the repository yet.
    #[error("no snapshot saved for {owner}/{name}")]
    SnapshotNotFound {
        /// Repository owner.
        owner: String,
        /// Repository name.
        name: String,
    },

    /// Reading a snapshot failed.
    #[error("failed to read snapshot: {message}")]
    QueryFailed {
        /// Error detail from the store.
        message: String,
    },

    /// Writing a snapshot failed.
    #[error("failed to write snapshot: {message}")]
    WriteFailed {
        /// Error detail from the store.
        message: String,
    },

    /// A snapshot payload could not be encoded or decoded.
    #[error("snapshot payload is malformed: {message}")]
    Serialisation {
        /// Error detail from `serde_json`.
        message: String,
    },
}
