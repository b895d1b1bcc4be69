//! Combines comment statistics and scores for a single pull request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PullRequest;

use super::comments::{CommentAnalyzer, PullRequestCommentSnapshot};
use super::scoring::{Score, Scorer};

/// Everything measured about one pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestMetrics {
    /// Pull request number.
    pub number: u64,
    /// Comment and approval statistics.
    pub snapshot: PullRequestCommentSnapshot,
    /// One score per scorer, in scorer order.
    pub scores: Vec<Score>,
}

impl PullRequestMetrics {
    /// Sum of the points of every score.
    #[must_use]
    pub fn points(&self) -> f64 {
        self.scores.iter().map(|score| score.points).sum()
    }
}

/// Produces [`PullRequestMetrics`] from a comment analyser and scorers.
#[derive(Clone)]
pub struct PullRequestAnalyzer {
    comments: CommentAnalyzer,
    scorers: Vec<Arc<dyn Scorer>>,
}

impl PullRequestAnalyzer {
    /// Creates an analyser applying `scorers` in order.
    #[must_use]
    pub fn new(comments: CommentAnalyzer, scorers: Vec<Arc<dyn Scorer>>) -> Self {
        Self { comments, scorers }
    }

    /// The scorers applied to every pull request.
    #[must_use]
    pub fn scorers(&self) -> &[Arc<dyn Scorer>] {
        &self.scorers
    }

    /// Measures `pull_request` now.
    #[must_use]
    pub fn analyze(&self, pull_request: &PullRequest) -> PullRequestMetrics {
        self.analyze_at(pull_request, Utc::now())
    }

    /// Measures `pull_request`, stamping the snapshot with `captured_at`.
    #[must_use]
    pub fn analyze_at(
        &self,
        pull_request: &PullRequest,
        captured_at: DateTime<Utc>,
    ) -> PullRequestMetrics {
        PullRequestMetrics {
            number: pull_request.number,
            snapshot: self
                .comments
                .calculate_comment_statistics_at(pull_request, captured_at),
            scores: self
                .scorers
                .iter()
                .map(|scorer| scorer.score(pull_request))
                .collect(),
        }
    }

    /// Measures every pull request in `pull_requests` with one timestamp.
    #[must_use]
    pub fn analyze_all(&self, pull_requests: &[PullRequest]) -> Vec<PullRequestMetrics> {
        let captured_at = Utc::now();
        pull_requests
            .iter()
            .map(|pull_request| self.analyze_at(pull_request, captured_at))
            .collect()
    }
}

impl std::fmt::Debug for PullRequestAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let attributes: Vec<&str> = self.scorers.iter().map(|scorer| scorer.attribute()).collect();
        f.debug_struct("PullRequestAnalyzer")
            .field("comments", &self.comments)
            .field("scorers", &attributes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::PullRequestAnalyzer;
    use crate::analysis::approval::GitHubApprovalAnalyzer;
    use crate::analysis::comments::CommentAnalyzer;
    use crate::analysis::scoring::{CountingScorer, PatternExtractingScorer, Scorer};
    use crate::model::test_support::{comment, fixture_time, pull_request};

    #[test]
    fn combines_snapshot_and_scores_in_scorer_order() {
        let participants: Arc<dyn Scorer> = Arc::new(CountingScorer::participants(1.0));
        let mentions: Arc<dyn Scorer> =
            Arc::new(PatternExtractingScorer::user_mentions(0.5).expect("pattern should compile"));
        let analyzer = PullRequestAnalyzer::new(
            CommentAnalyzer::new(Arc::new(GitHubApprovalAnalyzer::default())),
            vec![participants, mentions],
        );
        let mut pr = pull_request(3);
        pr.review_comments.push(comment(1, "lgtm @carol", "alice"));
        pr.diff_comments.push(comment(2, "typo here", "bob"));

        let metrics = analyzer.analyze_at(&pr, fixture_time());

        assert_eq!(metrics.number, 3);
        assert_eq!(metrics.snapshot.comment_count, 2);
        assert_eq!(metrics.snapshot.approval_count, 1);
        let attributes: Vec<&str> = metrics.scores.iter().map(|s| s.attribute.as_str()).collect();
        assert_eq!(attributes, vec!["participants", "user_mentions"]);
        assert!((metrics.points() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn analyze_all_keeps_input_order() {
        let analyzer = PullRequestAnalyzer::new(
            CommentAnalyzer::new(Arc::new(GitHubApprovalAnalyzer::default())),
            Vec::new(),
        );

        let metrics = analyzer.analyze_all(&[pull_request(5), pull_request(2)]);

        let numbers: Vec<u64> = metrics.iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![5, 2]);
        let stamps: Vec<_> = metrics.iter().map(|m| m.snapshot.captured_at).collect();
        assert_eq!(stamps.first(), stamps.last());
        assert!(metrics.iter().all(|m| m.points().abs() < f64::EPSILON));
    }
}
