//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! From lowest to highest:
//!
//! 1. **Defaults** – built-in application defaults
//! 2. **Configuration file** – `.repowatch.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `REPOWATCH_*`, plus `GITHUB_TOKEN` as a
//!    token fallback
//! 4. **Command-line arguments** – `--owner`/`-o`, `--repo`/`-r`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! owner = "octocat"
//! repo = "hello-world"
//! base_url = "https://github.com"
//! token = "ghp_example"
//! cache_dir = ".repowatch"
//! pacing_interval_ms = 250
//! state = "closed"
//! implicit_approvals = "lgtm, looks good to me"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::analysis::ApprovalMarkers;
use crate::analysis::approval::{
    DEFAULT_EXPLICIT_APPROVALS, DEFAULT_EXPLICIT_NON_APPROVALS, DEFAULT_IMPLICIT_APPROVALS,
};
use crate::error::RepowatchError;
use crate::github::PersonalAccessToken;
use crate::model::{PullRequestState, RepositoryKind, WatchedRepository};

const DEFAULT_BASE_URL: &str = "https://github.com";
const DEFAULT_KIND: &str = "github";
const DEFAULT_CACHE_DIR: &str = ".repowatch";
const DEFAULT_PACING_INTERVAL_MS: i64 = 100;
const DEFAULT_STATE: &str = "closed";
const DEFAULT_MENTION_MULTIPLIER: f64 = 0.5;
const DEFAULT_ISSUE_REFERENCE_MULTIPLIER: f64 = 0.25;
const DEFAULT_PARTICIPANT_MULTIPLIER: f64 = 1.0;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use repowatch::RepowatchConfig;
///
/// let config = RepowatchConfig::load().expect("failed to load configuration");
/// let repository = config.watched_repository().expect("owner and repo required");
/// println!("watching {}", repository.full_name());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOWATCH",
    discovery(
        dotfile_name = ".repowatch.toml",
        config_file_name = "repowatch.toml",
        app_name = "repowatch"
    )
)]
pub struct RepowatchConfig {
    /// Repository owner (e.g., "octocat").
    ///
    /// Can be provided via:
    /// - CLI: `--owner <OWNER>` or `-o <OWNER>`
    /// - Environment: `REPOWATCH_OWNER`
    /// - Config file: `owner = "..."`
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `REPOWATCH_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Platform base URL, e.g. `https://github.com` or a GitHub Enterprise
    /// host.
    #[ortho_config()]
    pub base_url: String,

    /// Hosting platform: `github` or `bitbucket`.
    #[ortho_config()]
    pub kind: String,

    /// Personal access token for the platform API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `REPOWATCH_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Directory holding JSON snapshots when no database is configured.
    #[ortho_config()]
    pub cache_dir: String,

    /// `SQLite` database path. When set, snapshots are stored there instead
    /// of in `cache_dir`.
    ///
    /// Can be provided via:
    /// - CLI: `--database-url <PATH>`
    /// - Environment: `REPOWATCH_DATABASE_URL`
    /// - Config file: `database_url = "..."`
    #[ortho_config()]
    pub database_url: Option<String>,

    /// Runs database migrations and exits.
    ///
    /// Can be provided via:
    /// - CLI: `--migrate-db`
    /// - Config file: `migrate_db = true`
    #[ortho_config()]
    pub migrate_db: bool,

    /// Delay after every comment graph fill, in milliseconds. Negative values
    /// are rejected when the manager is built.
    #[ortho_config()]
    pub pacing_interval_ms: i64,

    /// Skips the refresh from upstream and reports on the cached snapshot
    /// only.
    ///
    /// Can be provided via:
    /// - CLI: `--offline`
    /// - Config file: `offline = true`
    #[ortho_config()]
    pub offline: bool,

    /// Pull request state to refresh: `open`, `closed`, or `all`.
    #[ortho_config()]
    pub state: String,

    /// Comma-separated comments that approve when they are the whole text.
    #[ortho_config()]
    pub explicit_approvals: Option<String>,

    /// Comma-separated phrases that veto an approval.
    #[ortho_config()]
    pub explicit_non_approvals: Option<String>,

    /// Comma-separated phrases that approve anywhere in a comment.
    #[ortho_config()]
    pub implicit_approvals: Option<String>,

    /// Points per `@login` mention.
    #[ortho_config()]
    pub mention_multiplier: f64,

    /// Points per `#123` reference.
    #[ortho_config()]
    pub issue_reference_multiplier: f64,

    /// Points per distinct participant other than the submitter.
    #[ortho_config()]
    pub participant_multiplier: f64,
}

impl Default for RepowatchConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            kind: DEFAULT_KIND.to_owned(),
            token: None,
            cache_dir: DEFAULT_CACHE_DIR.to_owned(),
            database_url: None,
            migrate_db: false,
            pacing_interval_ms: DEFAULT_PACING_INTERVAL_MS,
            offline: false,
            state: DEFAULT_STATE.to_owned(),
            explicit_approvals: None,
            explicit_non_approvals: None,
            implicit_approvals: None,
            mention_multiplier: DEFAULT_MENTION_MULTIPLIER,
            issue_reference_multiplier: DEFAULT_ISSUE_REFERENCE_MULTIPLIER,
            participant_multiplier: DEFAULT_PARTICIPANT_MULTIPLIER,
        }
    }
}

impl RepowatchConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::MissingToken`](crate::github::UpstreamError::MissingToken)
    /// when no source provides a non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, RepowatchError> {
        let raw = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .unwrap_or_default();
        Ok(PersonalAccessToken::new(raw)?)
    }

    /// Returns owner and repo if both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`RepowatchError::Configuration`] when owner or repo is missing.
    pub fn require_repository_info(&self) -> Result<(&str, &str), RepowatchError> {
        match (&self.owner, &self.repo) {
            (Some(owner), Some(repo)) => Ok((owner.as_str(), repo.as_str())),
            (None, _) => Err(RepowatchError::configuration(
                "repository owner is required (use --owner or -o)",
            )),
            (_, None) => Err(RepowatchError::configuration(
                "repository name is required (use --repo or -r)",
            )),
        }
    }

    /// Parses the configured platform kind.
    ///
    /// # Errors
    ///
    /// Returns [`RepowatchError::Configuration`] for unknown kinds.
    pub fn repository_kind(&self) -> Result<RepositoryKind, RepowatchError> {
        RepositoryKind::parse(&self.kind).ok_or_else(|| {
            RepowatchError::configuration(format!(
                "unknown repository kind '{}' (expected github or bitbucket)",
                self.kind
            ))
        })
    }

    /// Parses the configured refresh state filter.
    ///
    /// # Errors
    ///
    /// Returns [`RepowatchError::Configuration`] for unknown states.
    pub fn refresh_state(&self) -> Result<PullRequestState, RepowatchError> {
        PullRequestState::parse(&self.state).ok_or_else(|| {
            RepowatchError::configuration(format!(
                "unknown pull request state '{}' (expected open, closed or all)",
                self.state
            ))
        })
    }

    /// Builds the watched repository, attaching the token when one resolves.
    ///
    /// A missing token is not an error here: offline runs never talk to the
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns [`RepowatchError::Configuration`] when owner, repo or kind are
    /// invalid and [`RepowatchError::Upstream`] when the base URL does not
    /// parse.
    pub fn watched_repository(&self) -> Result<WatchedRepository, RepowatchError> {
        let (owner, repo) = self.require_repository_info()?;
        let repository = WatchedRepository::new(owner, repo, &self.base_url, self.repository_kind()?)?;
        Ok(match self.resolve_token() {
            Ok(token) => repository.with_credential(token),
            Err(_) => repository,
        })
    }

    /// Approval markers, using the built-in list for any list left unset.
    #[must_use]
    pub fn approval_markers(&self) -> ApprovalMarkers {
        ApprovalMarkers::new(
            marker_list(self.explicit_approvals.as_deref(), DEFAULT_EXPLICIT_APPROVALS),
            marker_list(self.explicit_non_approvals.as_deref(), DEFAULT_EXPLICIT_NON_APPROVALS),
            marker_list(self.implicit_approvals.as_deref(), DEFAULT_IMPLICIT_APPROVALS),
        )
    }
}

fn marker_list(configured: Option<&str>, defaults: &[&str]) -> Vec<String> {
    configured.map_or_else(
        || defaults.iter().map(|marker| (*marker).to_owned()).collect(),
        |list| list.split(',').map(str::to_owned).collect(),
    )
}

#[cfg(test)]
mod tests;
