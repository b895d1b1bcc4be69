//! Errors surfaced by the `repowatch` binary.

use thiserror::Error;

use crate::github::UpstreamError;
use crate::persistence::PersistenceError;
use crate::repository::ManagerError;

/// Failure of a `repowatch` run, wrapping the error of whichever layer
/// failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepowatchError {
    /// Configuration is missing or inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable description of the problem.
        message: String,
    },

    /// Talking to the hosting platform failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Reading or writing the cache failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Initialising or refreshing the repository manager failed.
    #[error(transparent)]
    Manager(#[from] ManagerError),

    /// A scorer pattern failed to compile.
    #[error("invalid scorer pattern: {message}")]
    InvalidPattern {
        /// Compiler message from the regular expression engine.
        message: String,
    },

    /// Writing the report failed.
    #[error("failed to write output: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
    },
}

impl RepowatchError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<regex::Error> for RepowatchError {
    fn from(error: regex::Error) -> Self {
        Self::InvalidPattern {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for RepowatchError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
