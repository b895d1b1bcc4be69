//! Data models representing watched repositories, pull requests and comments.
//!
//! These are the values the repository manager caches and persists, and the
//! inputs every analyser works from. They serialise with `serde` so that cache
//! stores can persist them verbatim.

use serde::{Deserialize, Serialize};

mod pull_request;
mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use pull_request::{PullRequest, far_future};
pub use repository::{RepositoryKind, WatchedRepository};

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    /// Only open pull requests.
    Open,
    /// Only closed pull requests.
    #[default]
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    /// Parses a state filter name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A platform account that authored a pull request or comment.
///
/// Users compare and hash by `id` alone; logins can be renamed upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Platform account identifier.
    pub id: u64,
    /// Login handle at the time of fetching.
    pub login: String,
    /// Profile URL, when the platform supplies one.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl std::hash::Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Review workflow state attached to a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// The reviewer approved the change.
    Approved,
    /// The reviewer asked for changes.
    ChangesRequested,
    /// A previous review was dismissed.
    Dismissed,
    /// The review has not been submitted yet.
    Pending,
}

impl ReviewState {
    /// Maps a GitHub review state string onto a review state.
    ///
    /// `COMMENTED` and unknown values carry no workflow signal and map to
    /// `None`.
    #[must_use]
    pub fn from_github(value: &str) -> Option<Self> {
        match value {
            "APPROVED" => Some(Self::Approved),
            "CHANGES_REQUESTED" => Some(Self::ChangesRequested),
            "DISMISSED" => Some(Self::Dismissed),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A single comment in a pull request's comment graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: u64,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Comment body. Empty when the platform returned none.
    pub text: String,
    /// Comment author.
    pub author: User,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last edit timestamp, when the platform tracks one.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Review workflow state for approve/request-changes comments.
    #[serde(default)]
    pub review_state: Option<ReviewState>,
}

impl Comment {
    /// Returns true when the comment text is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::{PullRequestState, ReviewState, User};

    #[rstest]
    #[case::open("open", Some(PullRequestState::Open))]
    #[case::closed_upper("CLOSED", Some(PullRequestState::Closed))]
    #[case::all_padded("  all ", Some(PullRequestState::All))]
    #[case::unknown("merged", None)]
    fn parses_state_filters(#[case] input: &str, #[case] expected: Option<PullRequestState>) {
        assert_eq!(PullRequestState::parse(input), expected);
    }

    #[rstest]
    #[case::approved("APPROVED", Some(ReviewState::Approved))]
    #[case::changes("CHANGES_REQUESTED", Some(ReviewState::ChangesRequested))]
    #[case::commented("COMMENTED", None)]
    fn maps_github_review_states(#[case] input: &str, #[case] expected: Option<ReviewState>) {
        assert_eq!(ReviewState::from_github(input), expected);
    }

    #[test]
    fn users_compare_by_id_only() {
        let before = User {
            id: 7,
            login: "alice".to_owned(),
            html_url: None,
        };
        let renamed = User {
            id: 7,
            login: "alice-renamed".to_owned(),
            html_url: Some("https://github.com/alice-renamed".to_owned()),
        };

        assert_eq!(before, renamed);
        let unique: HashSet<User> = [before, renamed].into_iter().collect();
        assert_eq!(unique.len(), 1);
    }
}
