//! Rate limit snapshot reported by the GitHub API.
//!
//! When a listing or comment fetch is refused for quota reasons the client
//! queries `/rate_limit` and attaches the result to the error, so that the
//! caller can log when the quota resets.

use chrono::{DateTime, Utc};

/// Core rate limit figures for the authenticated token.
///
/// # Example
///
/// ```
/// use repowatch::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// assert_eq!(info.resets_at().map(|at| at.timestamp()), Some(1_700_000_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a snapshot from the raw header values.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true once no requests remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Reset instant as a UTC timestamp, when representable.
    #[must_use]
    pub fn resets_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.reset_at)
            .ok()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
    }

    /// Time left until the window resets, saturating at zero.
    #[must_use]
    pub fn time_until_reset(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.resets_at()
            .map_or_else(chrono::Duration::zero, |reset| {
                (reset - now).max(chrono::Duration::zero())
            })
    }
}
