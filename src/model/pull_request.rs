//! Pull request record cached by the repository manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, User};

/// 9999-12-31T23:59:59Z, the latest instant every serialiser round-trips.
const FAR_FUTURE_UNIX_SECONDS: i64 = 253_402_300_799;

/// Sentinel timestamp for pull requests that are not yet closed or merged.
#[must_use]
pub fn far_future() -> DateTime<Utc> {
    DateTime::from_timestamp(FAR_FUTURE_UNIX_SECONDS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A pull request together with its (possibly incomplete) comment graph.
///
/// `closed_at` and `merged_at` hold [`far_future`] until the pull request is
/// closed or merged; they are never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Platform-wide identifier.
    pub id: u64,
    /// Pull request number, unique within a repository.
    pub number: u64,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Author of the pull request.
    pub submitter: User,
    /// Lifecycle state as reported by the platform (e.g. open, closed).
    pub state: String,
    /// Creation timestamp.
    pub opened_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Close timestamp, or [`far_future`] while open.
    pub closed_at: DateTime<Utc>,
    /// Merge timestamp, or [`far_future`] while unmerged.
    pub merged_at: DateTime<Utc>,
    /// Approve/request-changes comments and general discussion.
    #[serde(default)]
    pub review_comments: Vec<Comment>,
    /// Comments attached to lines of the diff.
    #[serde(default)]
    pub diff_comments: Vec<Comment>,
    /// Comments attached to individual commits.
    #[serde(default)]
    pub commit_comments: Vec<Comment>,
    /// Whether the comment graph has been completely fetched.
    #[serde(default)]
    pub is_fully_interrogated: bool,
}

impl PullRequest {
    /// Iterates every comment: review, then diff, then commit comments.
    pub fn all_comments(&self) -> impl Iterator<Item = &Comment> {
        self.review_comments
            .iter()
            .chain(self.diff_comments.iter())
            .chain(self.commit_comments.iter())
    }

    /// Returns true once the pull request has a real close timestamp.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed_at < far_future()
    }

    /// Returns true once the pull request has a real merge timestamp.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merged_at < far_future()
    }
}
