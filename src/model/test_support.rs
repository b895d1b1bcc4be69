//! Test helpers for constructing pull request and comment fixtures.
//!
//! # Examples
//!
//! ```
//! use repowatch::model::test_support::{comment, pull_request};
//!
//! let mut pr = pull_request(7);
//! pr.review_comments.push(comment(1, "Looks good!", "alice"));
//! assert_eq!(pr.number, 7);
//! assert_eq!(pr.all_comments().count(), 1);
//! ```

use chrono::{DateTime, TimeZone, Utc};

use super::{
    Comment, PullRequest, RepositoryKind, ReviewState, User, WatchedRepository, far_future,
};

/// Fixed instant used for every fixture timestamp: 2025-01-01T00:00:00Z.
#[must_use]
pub fn fixture_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Builds a user whose id is derived from the login.
///
/// Logins differing only in case map to different ids, mirroring how the
/// platform treats them as separate accounts until proven otherwise.
#[must_use]
pub fn user(login: &str) -> User {
    let id = login
        .bytes()
        .fold(17_u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(byte)));
    User {
        id,
        login: login.to_owned(),
        html_url: Some(format!("https://github.com/{login}")),
    }
}

/// Builds a plain comment with the given id, text and author login.
#[must_use]
pub fn comment(id: u64, text: &str, author: &str) -> Comment {
    Comment {
        id,
        html_url: format!("https://github.com/octo/repo/pull/1#issuecomment-{id}"),
        text: text.to_owned(),
        author: user(author),
        created_at: fixture_time(),
        updated_at: None,
        review_state: None,
    }
}

/// Builds a review comment carrying a workflow state.
#[must_use]
pub fn review(id: u64, text: &str, author: &str, state: ReviewState) -> Comment {
    Comment {
        review_state: Some(state),
        ..comment(id, text, author)
    }
}

/// Builds an open pull request header with an empty comment graph.
#[must_use]
pub fn pull_request(number: u64) -> PullRequest {
    PullRequest {
        id: 1_000 + number,
        number,
        html_url: format!("https://github.com/octo/repo/pull/{number}"),
        submitter: user("octocat"),
        state: "open".to_owned(),
        opened_at: fixture_time(),
        updated_at: fixture_time(),
        closed_at: far_future(),
        merged_at: far_future(),
        review_comments: Vec::new(),
        diff_comments: Vec::new(),
        commit_comments: Vec::new(),
        is_fully_interrogated: false,
    }
}

/// Builds a pull request that was closed `hours_open` hours after opening.
#[must_use]
pub fn closed_pull_request(number: u64, hours_open: i64) -> PullRequest {
    let closed_at = fixture_time() + chrono::Duration::hours(hours_open);
    PullRequest {
        state: "closed".to_owned(),
        closed_at,
        updated_at: closed_at,
        ..pull_request(number)
    }
}

/// Builds the `octo/repo` GitHub repository used across tests.
///
/// # Panics
///
/// Never in practice: the identity parts are constant and valid.
#[must_use]
pub fn watched_repository() -> WatchedRepository {
    match WatchedRepository::new("octo", "repo", "https://github.com", RepositoryKind::GitHub) {
        Ok(repository) => repository,
        Err(error) => panic!("fixture repository should be valid: {error}"),
    }
}
