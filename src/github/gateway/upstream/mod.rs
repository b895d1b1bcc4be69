//! Octocrab-backed [`UpstreamClient`] for GitHub and GitHub Enterprise.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::error::UpstreamError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::rate_limit::RateLimitInfo;
use crate::model::{
    Comment, PullRequest, PullRequestState, RepositoryKind, WatchedRepository,
};

use super::UpstreamClient;
use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_octocrab_error};

mod api;

use api::{ApiComment, ApiPullRequest, ApiReview};

const PER_PAGE: &str = "100";

/// Upstream client bound to one repository's API endpoint.
pub struct OctocrabUpstreamClient {
    client: Octocrab,
    locator: RepositoryLocator,
}

impl OctocrabUpstreamClient {
    /// Creates a client from an existing Octocrab instance.
    #[must_use]
    pub const fn new(client: Octocrab, locator: RepositoryLocator) -> Self {
        Self { client, locator }
    }

    /// Builds an authenticated client for the locator's API base.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::InvalidUrl` when the base URI cannot be parsed or
    /// `UpstreamError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: RepositoryLocator,
    ) -> Result<Self, UpstreamError> {
        let client = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(client, locator))
    }

    /// Builds a client for a watched repository using its attached credential.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::UnsupportedPlatform` for non-GitHub
    /// repositories and `UpstreamError::MissingToken` when no credential is
    /// attached.
    pub fn for_repository(repository: &WatchedRepository) -> Result<Self, UpstreamError> {
        if repository.kind() != RepositoryKind::GitHub {
            return Err(UpstreamError::UnsupportedPlatform {
                platform: format!("{:?}", repository.kind()),
            });
        }
        let token = repository.credential().ok_or(UpstreamError::MissingToken)?;
        let locator = RepositoryLocator::from_watched(repository)?;
        Self::for_token(token, locator)
    }

    async fn fetch_all<T>(
        &self,
        operation: &str,
        path: String,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, UpstreamError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let first_page = match self.client.get::<Page<T>, _, _>(path, Some(&query)).await {
            Ok(page) => page,
            Err(error) => return Err(self.map_error_with_rate_limit(operation, &error).await),
        };

        match self.client.all_pages(first_page).await {
            Ok(items) => Ok(items),
            Err(error) => Err(self.map_error_with_rate_limit(operation, &error).await),
        }
    }

    async fn map_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> UpstreamError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message =
                    format!("{operation} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset})",
                        reset = info.reset_at()
                    ),
                    None => base_message,
                };

                UpstreamError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let limit = u32::try_from(rate.limit).ok()?;
        let remaining = u32::try_from(rate.remaining).ok()?;
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

#[async_trait]
impl UpstreamClient for OctocrabUpstreamClient {
    async fn list_pull_requests(
        &self,
        repository: &WatchedRepository,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>, UpstreamError> {
        let locator = RepositoryLocator::from_watched(repository)?;
        let query = [
            ("state", state.as_str()),
            ("sort", "created"),
            ("direction", "asc"),
            ("per_page", PER_PAGE),
        ];

        let pulls: Vec<ApiPullRequest> = self
            .fetch_all("list pulls", locator.pulls_path(), &query)
            .await?;
        debug!(
            repository = %repository.full_name(),
            count = pulls.len(),
            "listed pull requests"
        );
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn fill_comment_graph(
        &self,
        pull_request: &mut PullRequest,
    ) -> Result<(), UpstreamError> {
        let number = pull_request.number;
        let query = [("per_page", PER_PAGE)];

        let (diff, reviews, discussion) = tokio::try_join!(
            self.fetch_all::<ApiComment>(
                "diff comments",
                self.locator.diff_comments_path(number),
                &query
            ),
            self.fetch_all::<ApiReview>("reviews", self.locator.reviews_path(number), &query),
            self.fetch_all::<ApiComment>(
                "issue comments",
                self.locator.issue_comments_path(number),
                &query
            ),
        )?;

        pull_request
            .diff_comments
            .extend(diff.into_iter().map(Comment::from));
        pull_request
            .review_comments
            .extend(discussion.into_iter().map(Comment::from));
        pull_request
            .review_comments
            .extend(reviews.into_iter().map(Comment::from));
        pull_request.is_fully_interrogated = true;
        Ok(())
    }
}
