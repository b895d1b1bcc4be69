//! Scorers that count pattern matches in comment text.

use regex::Regex;

use crate::model::PullRequest;

use super::Scorer;

/// `@login` mentions, not preceded by a word character (so e-mail
/// addresses are skipped).
const USER_MENTION_PATTERN: &str = r"\B@[A-Za-z0-9][A-Za-z0-9-]*";

/// `#123` issue or pull request references.
const ISSUE_REFERENCE_PATTERN: &str = r"\B#[0-9]+\b";

/// Counts regular expression matches across every comment.
#[derive(Debug, Clone)]
pub struct PatternExtractingScorer {
    attribute: String,
    multiplier: f64,
    recognizer: Regex,
}

impl PatternExtractingScorer {
    /// Creates a scorer named `attribute` counting matches of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] when `pattern` does not compile.
    pub fn new(
        attribute: impl Into<String>,
        multiplier: f64,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            attribute: attribute.into(),
            multiplier,
            recognizer: Regex::new(pattern)?,
        })
    }

    /// Counts `@login` mentions.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in pattern fails to compile.
    pub fn user_mentions(multiplier: f64) -> Result<Self, regex::Error> {
        Self::new("user_mentions", multiplier, USER_MENTION_PATTERN)
    }

    /// Counts `#123` references.
    ///
    /// # Errors
    ///
    /// Returns an error only if the built-in pattern fails to compile.
    pub fn issue_references(multiplier: f64) -> Result<Self, regex::Error> {
        Self::new("issue_references", multiplier, ISSUE_REFERENCE_PATTERN)
    }

    /// Every non-overlapping match in `text`, left to right.
    #[must_use]
    pub fn extract<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.recognizer
            .find_iter(text)
            .map(|found| found.as_str())
            .collect()
    }
}

impl Scorer for PatternExtractingScorer {
    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn count(&self, pull_request: &PullRequest) -> u64 {
        pull_request
            .all_comments()
            .map(|comment| self.recognizer.find_iter(&comment.text).count())
            .fold(0_u64, |total, matches| {
                total.saturating_add(u64::try_from(matches).unwrap_or(u64::MAX))
            })
    }
}
