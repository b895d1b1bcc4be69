//! Rolls per pull request metrics up into repository health metrics.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryManager;

use super::pull_request::PullRequestMetrics;
use super::scoring::{Score, Scorer};
use super::statistics::{as_f64, mean, median_of};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Count and points accumulated for one scored attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreTotal {
    /// Sum of raw counts.
    pub count: u64,
    /// Sum of weighted points.
    pub points: f64,
}

/// Repository-wide health metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetrics {
    /// `owner/name` of the measured repository.
    pub repository: String,
    /// When the metrics were aggregated.
    pub captured_at: DateTime<Utc>,
    /// Pull requests measured.
    pub pull_request_count: u64,
    /// Non-blank comments across all pull requests.
    pub comment_count: u64,
    /// Words across all non-blank comments.
    pub word_count: u64,
    /// Distinct approvers summed over pull requests.
    pub approval_count: u64,
    /// Mean non-blank comments per pull request.
    pub mean_comments_per_pull_request: f64,
    /// Mean approvals per pull request.
    pub mean_approvals_per_pull_request: f64,
    /// Mean words per non-blank comment.
    pub mean_words_per_comment: f64,
    /// Median of the per pull request median words per comment.
    pub median_words_per_comment: f64,
    /// Pull requests with a real close timestamp.
    pub closed_pull_request_count: u64,
    /// Median hours between opening and closing, closed pull requests only.
    pub median_hours_open: f64,
    /// Totals per scored attribute, keyed by attribute name.
    pub score_totals: BTreeMap<String, ScoreTotal>,
    /// Points across every attribute.
    pub total_points: f64,
}

/// Aggregates [`PullRequestMetrics`] for one repository.
#[derive(Debug, Clone)]
pub struct RepositoryAnalyzer {
    repository: String,
}

impl RepositoryAnalyzer {
    /// Creates an analyser labelling its output with `repository`.
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
        }
    }

    /// Aggregates `metrics` as given.
    #[must_use]
    pub fn calculate_repository_metrics(&self, metrics: &[PullRequestMetrics]) -> RepositoryMetrics {
        self.calculate_repository_metrics_at(metrics, Utc::now())
    }

    /// Aggregates `metrics`, stamping the result with `captured_at`.
    #[must_use]
    pub fn calculate_repository_metrics_at(
        &self,
        metrics: &[PullRequestMetrics],
        captured_at: DateTime<Utc>,
    ) -> RepositoryMetrics {
        let mut totals = Totals::default();
        for entry in metrics {
            totals.add(entry);
        }
        totals.finish(self.repository.clone(), captured_at)
    }

    /// Re-scores every entry still cached by `manager`, then aggregates.
    ///
    /// For each entry whose pull request the manager holds, every scorer is
    /// run against the cached pull request and its score replaces the stored
    /// score with the same attribute, or is appended when there was none.
    /// Entries the manager does not hold keep their stored scores.
    pub async fn calculate_repository_metrics_live(
        &self,
        metrics: &[PullRequestMetrics],
        manager: &RepositoryManager,
        scorers: &[&dyn Scorer],
    ) -> RepositoryMetrics {
        let cached: HashMap<u64, _> = manager
            .get_all()
            .await
            .into_iter()
            .map(|pr| (pr.number, pr))
            .collect();

        let rescored: Vec<PullRequestMetrics> = metrics
            .iter()
            .map(|entry| {
                let mut updated = entry.clone();
                if let Some(pull_request) = cached.get(&entry.number) {
                    for scorer in scorers {
                        replace_score(&mut updated.scores, scorer.score(pull_request));
                    }
                }
                updated
            })
            .collect();

        self.calculate_repository_metrics(&rescored)
    }
}

fn replace_score(scores: &mut Vec<Score>, score: Score) {
    match scores
        .iter_mut()
        .find(|existing| existing.attribute == score.attribute)
    {
        Some(existing) => *existing = score,
        None => scores.push(score),
    }
}

#[derive(Default)]
struct Totals {
    pull_requests: u64,
    comments: u64,
    words: u64,
    approvals: u64,
    closed: u64,
    medians: Vec<f64>,
    hours_open: Vec<f64>,
    scores: BTreeMap<String, ScoreTotal>,
}

impl Totals {
    #[expect(clippy::float_arithmetic, reason = "accumulating points and hours")]
    fn add(&mut self, entry: &PullRequestMetrics) {
        let snapshot = &entry.snapshot;
        self.pull_requests = self.pull_requests.saturating_add(1);
        self.comments = self.comments.saturating_add(snapshot.comment_count);
        self.words = self.words.saturating_add(snapshot.comment_word_count);
        self.approvals = self.approvals.saturating_add(snapshot.approval_count);
        self.medians.push(snapshot.median_words_per_comment);

        if snapshot.is_closed() {
            self.closed = self.closed.saturating_add(1);
            let seconds = u64::try_from(snapshot.open_for().num_seconds()).unwrap_or(0);
            self.hours_open.push(as_f64(seconds) / SECONDS_PER_HOUR);
        }

        for score in &entry.scores {
            let total = self.scores.entry(score.attribute.clone()).or_default();
            total.count = total.count.saturating_add(score.count);
            total.points += score.points;
        }
    }

    fn finish(self, repository: String, captured_at: DateTime<Utc>) -> RepositoryMetrics {
        let total_points = self.scores.values().map(|total| total.points).sum();
        RepositoryMetrics {
            repository,
            captured_at,
            pull_request_count: self.pull_requests,
            comment_count: self.comments,
            word_count: self.words,
            approval_count: self.approvals,
            mean_comments_per_pull_request: mean(self.comments, self.pull_requests),
            mean_approvals_per_pull_request: mean(self.approvals, self.pull_requests),
            mean_words_per_comment: mean(self.words, self.comments),
            median_words_per_comment: median_of(self.medians),
            closed_pull_request_count: self.closed,
            median_hours_open: median_of(self.hours_open),
            score_totals: self.scores,
            total_points,
        }
    }
}
