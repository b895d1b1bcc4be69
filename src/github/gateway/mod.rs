//! Upstream clients that supply pull request headers and comment graphs.
//!
//! The repository manager depends only on the [`UpstreamClient`] trait so
//! that tests can substitute fakes, while [`OctocrabUpstreamClient`] talks
//! to GitHub and GitHub Enterprise.

mod client;
mod error_mapping;
mod upstream;

pub use upstream::OctocrabUpstreamClient;

use async_trait::async_trait;

use crate::github::error::UpstreamError;
use crate::model::{PullRequest, PullRequestState, WatchedRepository};

/// Source of pull request data for a watched repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Lists pull request headers matching `state`, oldest first.
    ///
    /// Returned pull requests carry no comments and are not fully
    /// interrogated.
    async fn list_pull_requests(
        &self,
        repository: &WatchedRepository,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, UpstreamError>;

    /// Fetches the complete comment graph of `pull_request`.
    ///
    /// On success the diff, discussion and review comments are appended and
    /// the pull request is marked fully interrogated. On error the pull
    /// request must be treated as unfilled.
    async fn fill_comment_graph(&self, pull_request: &mut PullRequest)
    -> Result<(), UpstreamError>;
}
