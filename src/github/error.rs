//! Error types exposed by the upstream platform layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while identifying a repository or talking to its platform.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// A URL could not be parsed.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// Repository owner or name was empty.
    #[error("repository owner and name must both be non-empty")]
    MissingPathSegments,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The platform has no client implementation.
    #[error("no upstream client is available for {platform}")]
    UnsupportedPlatform {
        /// Name of the platform that was requested.
        platform: String,
    },

    /// The authentication token was rejected by the platform.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The platform returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body describing the failure.
        message: String,
    },

    /// Networking failed while calling the platform.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be fetched.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },
}
