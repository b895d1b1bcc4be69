//! Scorers that count comments or commenters directly.

use std::collections::HashSet;

use crate::model::PullRequest;

use super::Scorer;

/// Counts with a plain function over the pull request.
#[derive(Debug, Clone)]
pub struct CountingScorer {
    attribute: String,
    multiplier: f64,
    counter: fn(&PullRequest) -> u64,
}

impl CountingScorer {
    /// Creates a scorer named `attribute` that weights `counter` by
    /// `multiplier`.
    pub fn new(
        attribute: impl Into<String>,
        multiplier: f64,
        counter: fn(&PullRequest) -> u64,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            multiplier,
            counter,
        }
    }

    /// Comments with non-blank text across every collection.
    #[must_use]
    pub fn non_empty_comments(multiplier: f64) -> Self {
        Self::new("non_empty_comments", multiplier, count_non_empty_comments)
    }

    /// Comments attached to lines of the diff.
    #[must_use]
    pub fn diff_comments(multiplier: f64) -> Self {
        Self::new("diff_comments", multiplier, count_diff_comments)
    }

    /// Distinct commenters other than the submitter, ignoring login case.
    #[must_use]
    pub fn participants(multiplier: f64) -> Self {
        Self::new("participants", multiplier, count_participants)
    }
}

impl Scorer for CountingScorer {
    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn count(&self, pull_request: &PullRequest) -> u64 {
        (self.counter)(pull_request)
    }
}

fn saturating_len(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn count_non_empty_comments(pull_request: &PullRequest) -> u64 {
    saturating_len(
        pull_request
            .all_comments()
            .filter(|comment| !comment.is_blank())
            .count(),
    )
}

fn count_diff_comments(pull_request: &PullRequest) -> u64 {
    saturating_len(pull_request.diff_comments.len())
}

fn count_participants(pull_request: &PullRequest) -> u64 {
    let submitter = pull_request.submitter.login.to_lowercase();
    let participants: HashSet<String> = pull_request
        .all_comments()
        .map(|comment| comment.author.login.to_lowercase())
        .filter(|login| *login != submitter)
        .collect();
    saturating_len(participants.len())
}
