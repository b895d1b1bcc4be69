//! Cached pull request history for a watched repository.
//!
//! [`RepositoryManager`] keeps a canonical map of pull request number to
//! pull request, seeds it from a [`CacheStore`](crate::persistence::CacheStore)
//! and brings it up to date from an
//! [`UpstreamClient`](crate::github::UpstreamClient) while spacing requests
//! by a fixed pacing interval.

mod builder;
mod error;
mod manager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use builder::{DEFAULT_PACING_INTERVAL, RepositoryManagerBuilder};
pub use error::ManagerError;
pub use manager::{RefreshOutcome, RepositoryManager};
