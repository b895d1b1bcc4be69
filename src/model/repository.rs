//! Identity of a repository whose pull request history is being watched.

use url::Url;

use crate::github::error::UpstreamError;
use crate::github::locator::{PersonalAccessToken, RepositoryName, RepositoryOwner};

/// Hosting platform a watched repository lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    /// GitHub.com or GitHub Enterprise.
    GitHub,
    /// BitBucket Cloud or Server.
    BitBucket,
}

impl RepositoryKind {
    /// Parses a platform name such as `github` or `bitbucket`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "bitbucket" => Some(Self::BitBucket),
            _ => None,
        }
    }
}

/// A repository registered for history tracking.
///
/// Identity is the `(owner, name, base_url)` triple; the credential and
/// description do not participate in equality. Values are immutable once
/// built.
#[derive(Debug, Clone)]
pub struct WatchedRepository {
    owner: RepositoryOwner,
    name: RepositoryName,
    base_url: Url,
    kind: RepositoryKind,
    credential: Option<PersonalAccessToken>,
    description: Option<String>,
}

impl WatchedRepository {
    /// Builds a watched repository from its identity parts.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::MissingPathSegments`] when owner or name is
    /// empty and [`UpstreamError::InvalidUrl`] when `base_url` does not parse.
    pub fn new(
        owner: &str,
        name: &str,
        base_url: &str,
        kind: RepositoryKind,
    ) -> Result<Self, UpstreamError> {
        let parsed =
            Url::parse(base_url).map_err(|error| UpstreamError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
            base_url: parsed,
            kind,
            credential: None,
            description: None,
        })
    }

    /// Attaches the access token used to talk to the platform.
    #[must_use]
    pub fn with_credential(mut self, credential: PersonalAccessToken) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Attaches a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Base URL of the hosting platform (e.g. `https://github.com`).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Hosting platform.
    #[must_use]
    pub const fn kind(&self) -> RepositoryKind {
        self.kind
    }

    /// Access token, when one was attached.
    #[must_use]
    pub const fn credential(&self) -> Option<&PersonalAccessToken> {
        self.credential.as_ref()
    }

    /// Free-text description, when one was attached.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

impl PartialEq for WatchedRepository {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name && self.base_url == other.base_url
    }
}

impl Eq for WatchedRepository {}
