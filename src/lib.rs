//! Repowatch library crate: cached pull request history and repository
//! health metrics.
//!
//! [`repository::RepositoryManager`] keeps a repository's pull requests and
//! their comment graphs in memory, refreshes them from the hosting platform
//! through a [`github::UpstreamClient`] with paced requests, and persists
//! snapshots through a [`persistence::CacheStore`]. The [`analysis`] module
//! turns cached pull requests into comment statistics, weighted scores and
//! repository-level metrics.

pub mod analysis;
pub mod config;
pub mod error;
pub mod github;
pub mod model;
pub mod persistence;
pub mod repository;
pub mod telemetry;

pub use config::RepowatchConfig;
pub use error::RepowatchError;
pub use github::{
    OctocrabUpstreamClient, PersonalAccessToken, RepositoryLocator, UpstreamClient, UpstreamError,
};
pub use repository::{ManagerError, RepositoryManager};
