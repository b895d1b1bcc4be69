//! Identity wrappers and API path construction for watched repositories.

use url::Url;

use super::error::UpstreamError;
use crate::model::WatchedRepository;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, UpstreamError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UpstreamError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, UpstreamError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UpstreamError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, UpstreamError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UpstreamError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Derives the GitHub API base URL from a platform base URL.
///
/// `github.com` maps to `https://api.github.com`; any other host is treated
/// as GitHub Enterprise and maps to `<scheme>://<host>[:port]/api/v3`.
fn derive_api_base(base_url: &Url) -> Result<Url, UpstreamError> {
    let host = base_url
        .host_str()
        .ok_or_else(|| UpstreamError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| UpstreamError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{}://{authority}", base_url.scheme()))
        .map_err(|error| UpstreamError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(base_url.port())
        .map_err(|()| UpstreamError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Repository identity paired with its derived API base.
///
/// # Example
///
/// ```
/// use repowatch::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::from_owner_repo("octo", "repo")
///     .expect("should create repository locator");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator for a repository hosted on `github.com`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, UpstreamError> {
        let api_base = Url::parse("https://api.github.com")
            .map_err(|error| UpstreamError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Creates a locator for a watched repository, deriving the API base from
    /// its platform base URL.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::InvalidUrl` when the base URL has no host.
    pub fn from_watched(repository: &WatchedRepository) -> Result<Self, UpstreamError> {
        Ok(Self {
            api_base: derive_api_base(repository.base_url())?,
            owner: repository.owner().clone(),
            repository: repository.name().clone(),
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// API path for listing pull requests.
    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    /// API path for comments attached to lines of a pull request diff.
    pub(crate) fn diff_comments_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}/comments", self.repo_path())
    }

    /// API path for the reviews submitted on a pull request.
    pub(crate) fn reviews_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}/reviews", self.repo_path())
    }

    /// API path for the discussion thread of a pull request.
    pub(crate) fn issue_comments_path(&self, number: u64) -> String {
        format!("{}/issues/{number}/comments", self.repo_path())
    }
}
