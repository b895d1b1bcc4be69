//! Errors raised by the repository manager.

use thiserror::Error;

use crate::github::UpstreamError;
use crate::persistence::PersistenceError;

/// Errors surfaced while building or refreshing a repository manager.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManagerError {
    /// A required collaborator was not supplied to the builder.
    #[error("repository manager requires a {dependency}")]
    MissingDependency {
        /// Name of the missing collaborator.
        dependency: &'static str,
    },

    /// The pacing interval was negative.
    #[error("pacing interval must not be negative (got {millis} ms)")]
    NegativePacingInterval {
        /// Interval that was supplied, in milliseconds.
        millis: i64,
    },

    /// Listing pull requests upstream failed; nothing was merged.
    #[error("upstream listing failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Persisting the merged snapshot failed; the in-memory merge stands.
    #[error("snapshot persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}
