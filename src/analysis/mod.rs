//! Comment statistics, weighted scores and repository health metrics.
//!
//! The pipeline runs per pull request first: [`CommentAnalyzer`] computes a
//! [`PullRequestCommentSnapshot`], the [`Scorer`]s produce [`Score`]s, and
//! [`PullRequestAnalyzer`] bundles both into [`PullRequestMetrics`].
//! [`RepositoryAnalyzer`] then rolls those up into [`RepositoryMetrics`].

pub mod approval;
pub mod comments;
pub mod pull_request;
pub mod repository;
pub mod scoring;
mod statistics;

pub use approval::{
    ApprovalAnalyzer, ApprovalMarkers, BitBucketApprovalAnalyzer, GitHubApprovalAnalyzer,
    approval_analyzer_for,
};
pub use comments::{CommentAnalyzer, PullRequestCommentSnapshot, word_count};
pub use pull_request::{PullRequestAnalyzer, PullRequestMetrics};
pub use repository::{RepositoryAnalyzer, RepositoryMetrics, ScoreTotal};
pub use scoring::{CountingScorer, PatternExtractingScorer, Score, Scorer};
pub use statistics::median;
