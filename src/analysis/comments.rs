//! Per pull request comment and approval statistics.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Comment, PullRequest, far_future};

use super::approval::ApprovalAnalyzer;
use super::statistics::median;

/// Comment statistics for one pull request at a point in time.
///
/// Snapshots are derived data: recompute them from the cached pull request
/// rather than treating them as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestCommentSnapshot {
    /// When the statistics were computed.
    pub captured_at: DateTime<Utc>,
    /// Pull request number.
    pub number: u64,
    /// When the pull request was opened.
    pub opened_at: DateTime<Utc>,
    /// When the pull request was closed, or the far-future sentinel.
    pub closed_at: DateTime<Utc>,
    /// Distinct reviewers who approved.
    pub approval_count: u64,
    /// Comments with non-blank text.
    pub comment_count: u64,
    /// Words across all non-blank comments.
    pub comment_word_count: u64,
    /// Median words per non-blank comment.
    pub median_words_per_comment: f64,
}

impl PullRequestCommentSnapshot {
    /// Time between opening and closing.
    ///
    /// Open pull requests report the distance to the far-future sentinel.
    #[must_use]
    pub fn open_for(&self) -> Duration {
        self.closed_at - self.opened_at
    }

    /// Returns true when the snapshot carries a real close timestamp.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed_at < far_future()
    }
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace()
        .fold(0_u64, |count, _| count.saturating_add(1))
}

/// Computes comment statistics using an injected approval policy.
#[derive(Clone)]
pub struct CommentAnalyzer {
    approvals: Arc<dyn ApprovalAnalyzer>,
}

impl CommentAnalyzer {
    /// Creates an analyser that asks `approvals` which review comments
    /// approve.
    #[must_use]
    pub fn new(approvals: Arc<dyn ApprovalAnalyzer>) -> Self {
        Self { approvals }
    }

    /// Computes the comment snapshot for `pull_request`, stamped with the
    /// current time.
    #[must_use]
    pub fn calculate_comment_statistics(&self, pull_request: &PullRequest) -> PullRequestCommentSnapshot {
        self.calculate_comment_statistics_at(pull_request, Utc::now())
    }

    /// Computes the comment snapshot for `pull_request`, stamped with
    /// `captured_at`.
    ///
    /// Blank comments are ignored entirely; they neither count as comments
    /// nor contribute zero-word samples to the median.
    #[must_use]
    pub fn calculate_comment_statistics_at(
        &self,
        pull_request: &PullRequest,
        captured_at: DateTime<Utc>,
    ) -> PullRequestCommentSnapshot {
        let word_counts: Vec<u64> = pull_request
            .all_comments()
            .filter(|comment| !comment.is_blank())
            .map(|comment| word_count(&comment.text))
            .collect();
        let approval_count = self.get_approvals(pull_request).len();

        PullRequestCommentSnapshot {
            captured_at,
            number: pull_request.number,
            opened_at: pull_request.opened_at,
            closed_at: pull_request.closed_at,
            approval_count: u64::try_from(approval_count).unwrap_or(u64::MAX),
            comment_count: u64::try_from(word_counts.len()).unwrap_or(u64::MAX),
            comment_word_count: word_counts
                .iter()
                .fold(0_u64, |total, words| total.saturating_add(*words)),
            median_words_per_comment: median(&word_counts),
        }
    }

    /// Approving review comments grouped by lower-cased author login.
    ///
    /// Only the review collection is considered.
    #[must_use]
    pub fn get_approvals(&self, pull_request: &PullRequest) -> HashMap<String, Vec<Comment>> {
        let mut approvals: HashMap<String, Vec<Comment>> = HashMap::new();
        for comment in pull_request
            .review_comments
            .iter()
            .filter(|comment| self.approvals.is_approved(comment))
        {
            approvals
                .entry(comment.author.login.to_lowercase())
                .or_default()
                .push(comment.clone());
        }
        approvals
    }
}

impl std::fmt::Debug for CommentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentAnalyzer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use rstest::{fixture, rstest};

    use super::{CommentAnalyzer, word_count};
    use crate::analysis::approval::GitHubApprovalAnalyzer;
    use crate::model::ReviewState;
    use crate::model::test_support::{
        closed_pull_request, comment, fixture_time, pull_request, review,
    };

    #[fixture]
    fn analyzer() -> CommentAnalyzer {
        CommentAnalyzer::new(Arc::new(GitHubApprovalAnalyzer::default()))
    }

    #[rstest]
    #[case::empty("", 0)]
    #[case::whitespace(" \t\n ", 0)]
    #[case::mixed_separators("hello\tworld \n again", 3)]
    fn counts_words(#[case] text: &str, #[case] expected: u64) {
        assert_eq!(word_count(text), expected);
    }

    #[rstest]
    fn blank_comments_are_excluded(analyzer: CommentAnalyzer) {
        let mut pr = pull_request(1);
        pr.review_comments.push(comment(1, "", "alice"));
        pr.diff_comments.push(comment(2, "   ", "bob"));
        pr.commit_comments.push(comment(3, "hello world", "carol"));

        let snapshot = analyzer.calculate_comment_statistics_at(&pr, fixture_time());

        assert_eq!(snapshot.comment_count, 1);
        assert_eq!(snapshot.comment_word_count, 2);
        assert!((snapshot.median_words_per_comment - 2.0).abs() < f64::EPSILON);
        assert_eq!(snapshot.captured_at, fixture_time());
    }

    #[rstest]
    fn snapshot_carries_pull_request_timing(analyzer: CommentAnalyzer) {
        let pr = closed_pull_request(4, 36);

        let snapshot = analyzer.calculate_comment_statistics_at(&pr, fixture_time());

        assert_eq!(snapshot.number, 4);
        assert_eq!(snapshot.open_for(), Duration::hours(36));
        assert!(snapshot.is_closed());
        assert_eq!(snapshot.comment_count, 0);
        assert!(snapshot.median_words_per_comment.abs() < f64::EPSILON);
    }

    #[rstest]
    fn open_pull_requests_are_not_closed(analyzer: CommentAnalyzer) {
        let snapshot = analyzer.calculate_comment_statistics_at(&pull_request(2), fixture_time());

        assert!(!snapshot.is_closed());
    }

    #[rstest]
    fn approvals_group_logins_case_insensitively(analyzer: CommentAnalyzer) {
        let mut pr = pull_request(1);
        pr.review_comments.push(review(1, "", "Alice", ReviewState::Approved));
        pr.review_comments.push(comment(2, "lgtm", "alice"));
        pr.review_comments.push(comment(3, "please rename", "bob"));

        let approvals = analyzer.get_approvals(&pr);

        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals.get("alice").map(Vec::len), Some(2));
        let snapshot = analyzer.calculate_comment_statistics_at(&pr, fixture_time());
        assert_eq!(snapshot.approval_count, 1);
    }

    #[rstest]
    fn approvals_ignore_diff_and_commit_comments(analyzer: CommentAnalyzer) {
        let mut pr = pull_request(1);
        pr.diff_comments.push(comment(1, "lgtm", "alice"));
        pr.commit_comments.push(comment(2, "lgtm", "bob"));

        assert!(analyzer.get_approvals(&pr).is_empty());
    }
}
