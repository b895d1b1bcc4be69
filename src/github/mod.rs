//! GitHub upstream access for watched repositories.
//!
//! This module wraps Octocrab to list a repository's pull requests and to
//! fetch each pull request's comment graph. Errors are mapped into
//! user-friendly variants so that callers can surface precise failures
//! without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod rate_limit;

pub use error::UpstreamError;
pub use gateway::{OctocrabUpstreamClient, UpstreamClient};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockUpstreamClient;
