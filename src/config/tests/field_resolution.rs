//! Tests for token, repository, kind, state and marker resolution.

use rstest::rstest;

use crate::RepowatchConfig;
use crate::error::RepowatchError;
use crate::github::UpstreamError;
use crate::model::{PullRequestState, RepositoryKind};

fn configured_repository() -> RepowatchConfig {
    RepowatchConfig {
        owner: Some("octocat".to_owned()),
        repo: Some("hello-world".to_owned()),
        ..Default::default()
    }
}

#[rstest]
fn resolve_token_prefers_configured_value() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = RepowatchConfig {
        token: Some("config-token".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");

    assert_eq!(token.value(), "config-token");
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);

    let token = RepowatchConfig::default()
        .resolve_token()
        .expect("token should resolve");

    assert_eq!(token.value(), "env-token");
}

#[rstest]
#[case::absent(None)]
#[case::blank(Some("   "))]
fn resolve_token_fails_without_a_value(#[case] configured: Option<&str>) {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = RepowatchConfig {
        token: configured.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_token().err(),
        Some(RepowatchError::Upstream(UpstreamError::MissingToken))
    );
}

#[rstest]
#[case::owner_missing(None, Some("hello-world"), "owner")]
#[case::repo_missing(Some("octocat"), None, "name")]
fn require_repository_info_reports_missing_parts(
    #[case] owner: Option<&str>,
    #[case] repo: Option<&str>,
    #[case] mentioned: &str,
) {
    let config = RepowatchConfig {
        owner: owner.map(str::to_owned),
        repo: repo.map(str::to_owned),
        ..Default::default()
    };

    let error = config
        .require_repository_info()
        .expect_err("should fail when a part is missing");

    assert!(
        matches!(&error, RepowatchError::Configuration { message } if message.contains(mentioned)),
        "unexpected error: {error}"
    );
}

#[rstest]
#[case::github("GitHub", RepositoryKind::GitHub)]
#[case::bitbucket("bitbucket", RepositoryKind::BitBucket)]
fn parses_repository_kind(#[case] kind: &str, #[case] expected: RepositoryKind) {
    let config = RepowatchConfig {
        kind: kind.to_owned(),
        ..Default::default()
    };

    assert_eq!(config.repository_kind().ok(), Some(expected));
}

#[rstest]
fn rejects_unknown_kind_and_state() {
    let config = RepowatchConfig {
        kind: "gitlab".to_owned(),
        state: "merged".to_owned(),
        ..Default::default()
    };

    assert!(matches!(
        config.repository_kind(),
        Err(RepowatchError::Configuration { .. })
    ));
    assert!(matches!(
        config.refresh_state(),
        Err(RepowatchError::Configuration { .. })
    ));
}

#[rstest]
fn refresh_state_defaults_to_closed() {
    assert_eq!(
        RepowatchConfig::default().refresh_state().ok(),
        Some(PullRequestState::Closed)
    );
}

#[rstest]
fn watched_repository_attaches_resolved_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = RepowatchConfig {
        token: Some("ghp_example".to_owned()),
        ..configured_repository()
    };

    let repository = config
        .watched_repository()
        .expect("repository should build");

    assert_eq!(repository.full_name(), "octocat/hello-world");
    assert_eq!(repository.kind(), RepositoryKind::GitHub);
    assert_eq!(repository.credential().map(|token| token.value()), Some("ghp_example"));
}

#[rstest]
fn watched_repository_without_token_has_no_credential() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);

    let repository = configured_repository()
        .watched_repository()
        .expect("repository should build");

    assert!(repository.credential().is_none());
}

#[rstest]
fn watched_repository_rejects_invalid_base_url() {
    let config = RepowatchConfig {
        base_url: "not a url".to_owned(),
        ..configured_repository()
    };

    assert!(matches!(
        config.watched_repository(),
        Err(RepowatchError::Upstream(UpstreamError::InvalidUrl(_)))
    ));
}

#[rstest]
fn approval_markers_split_configured_lists() {
    let config = RepowatchConfig {
        implicit_approvals: Some("ship it, Works For Me".to_owned()),
        explicit_approvals: Some(String::new()),
        ..Default::default()
    };

    let markers = config.approval_markers();

    assert_eq!(
        markers.implicit_approvals(),
        ["ship it".to_owned(), "works for me".to_owned()]
    );
    assert!(markers.explicit_approvals().is_empty());
    assert!(markers.explicit_non_approvals().contains(&"not lgtm".to_owned()));
}
