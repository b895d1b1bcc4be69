//! Weighted scores derived from a pull request's comment graph.
//!
//! Every [`Scorer`] counts something in a pull request and multiplies the
//! count by a weight. The weighted value is rounded half away from zero to
//! two decimal places, identically for every strategy.

mod counting;
mod pattern;

use serde::{Deserialize, Serialize};

use crate::model::PullRequest;

pub use counting::CountingScorer;
pub use pattern::PatternExtractingScorer;

/// Decimal places kept in [`Score::points`].
pub const POINTS_DECIMALS: u8 = 2;

/// One scored attribute of a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Attribute the scorer measures, e.g. `user_mentions`.
    pub attribute: String,
    /// Raw count before weighting.
    pub count: u64,
    /// Weighted and rounded count.
    pub points: f64,
}

/// A weighted counting strategy.
pub trait Scorer: Send + Sync {
    /// Name of the measured attribute.
    fn attribute(&self) -> &str;

    /// Weight applied to each counted item.
    fn multiplier(&self) -> f64;

    /// Counts occurrences of the attribute in `pull_request`.
    fn count(&self, pull_request: &PullRequest) -> u64;

    /// Counts and weights the attribute for `pull_request`.
    fn score(&self, pull_request: &PullRequest) -> Score {
        let count = self.count(pull_request);
        Score {
            attribute: self.attribute().to_owned(),
            count,
            points: weighted_points(count, self.multiplier()),
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "weighting a count")]
fn weighted_points(count: u64, multiplier: f64) -> f64 {
    round_half_away_from_zero(super::statistics::as_f64(count) * multiplier, POINTS_DECIMALS)
}

/// Rounds `value` to `decimals` places, sending midpoints away from zero.
///
/// # Examples
///
/// ```
/// use repowatch::analysis::scoring::round_half_away_from_zero;
///
/// assert_eq!(round_half_away_from_zero(0.375, 2), 0.38);
/// assert_eq!(round_half_away_from_zero(-0.375, 2), -0.38);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "decimal rounding")]
pub fn round_half_away_from_zero(value: f64, decimals: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}
