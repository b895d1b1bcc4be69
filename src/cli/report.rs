//! Refreshes the pull request cache and measures the repository.

use std::sync::Arc;

use async_trait::async_trait;
use repowatch::analysis::{
    CommentAnalyzer, CountingScorer, PatternExtractingScorer, PullRequestAnalyzer,
    RepositoryAnalyzer, RepositoryMetrics, Scorer, approval_analyzer_for,
};
use repowatch::github::{OctocrabUpstreamClient, UpstreamClient, UpstreamError};
use repowatch::model::{PullRequest, PullRequestState, WatchedRepository};
use repowatch::persistence::{CacheStore, FilesystemCacheStore, SqliteCacheStore};
use repowatch::repository::RepositoryManager;
use repowatch::telemetry::StderrJsonlTelemetrySink;
use repowatch::{RepowatchConfig, RepowatchError};

/// Loads the cached history, refreshes it unless running offline, and
/// computes repository metrics from the result.
///
/// # Errors
///
/// Returns [`RepowatchError`] when configuration is invalid, the upstream
/// client cannot be built, or the refresh fails.
pub async fn run(config: &RepowatchConfig) -> Result<RepositoryMetrics, RepowatchError> {
    let repository = config.watched_repository()?;
    let state = config.refresh_state()?;
    let scorers = build_scorers(config)?;

    let manager = RepositoryManager::builder(repository.clone())
        .upstream(build_upstream(&repository, config.offline)?)
        .cache_store(build_cache_store(config)?)
        .telemetry(Arc::new(StderrJsonlTelemetrySink))
        .pacing_interval_millis(config.pacing_interval_ms)
        .initialize()
        .await?;

    if !config.offline {
        manager.refresh_from_upstream(state).await?;
    }

    let comments = CommentAnalyzer::new(approval_analyzer_for(
        repository.kind(),
        config.approval_markers(),
    ));
    let metrics = PullRequestAnalyzer::new(comments, scorers).analyze_all(&manager.get_all().await);
    Ok(RepositoryAnalyzer::new(repository.full_name()).calculate_repository_metrics(&metrics))
}

fn build_scorers(config: &RepowatchConfig) -> Result<Vec<Arc<dyn Scorer>>, RepowatchError> {
    let participants: Arc<dyn Scorer> =
        Arc::new(CountingScorer::participants(config.participant_multiplier));
    let mentions: Arc<dyn Scorer> =
        Arc::new(PatternExtractingScorer::user_mentions(config.mention_multiplier)?);
    let references: Arc<dyn Scorer> = Arc::new(PatternExtractingScorer::issue_references(
        config.issue_reference_multiplier,
    )?);
    Ok(vec![participants, mentions, references])
}

fn build_cache_store(config: &RepowatchConfig) -> Result<Arc<dyn CacheStore>, RepowatchError> {
    Ok(match config.database_url.as_deref() {
        Some(database_url) => Arc::new(SqliteCacheStore::new(database_url)?),
        None => Arc::new(FilesystemCacheStore::new(config.cache_dir.clone())),
    })
}

fn build_upstream(
    repository: &WatchedRepository,
    offline: bool,
) -> Result<Arc<dyn UpstreamClient>, RepowatchError> {
    if offline {
        return Ok(Arc::new(OfflineUpstream));
    }
    Ok(Arc::new(OctocrabUpstreamClient::for_repository(repository)?))
}

/// Stands in for the platform client when running offline; every call fails.
struct OfflineUpstream;

impl OfflineUpstream {
    fn unavailable() -> UpstreamError {
        UpstreamError::Network {
            message: "running offline".to_owned(),
        }
    }
}

#[async_trait]
impl UpstreamClient for OfflineUpstream {
    async fn list_pull_requests(
        &self,
        _repository: &WatchedRepository,
        _state: PullRequestState,
    ) -> Result<Vec<PullRequest>, UpstreamError> {
        Err(Self::unavailable())
    }

    async fn fill_comment_graph(&self, _pull_request: &mut PullRequest) -> Result<(), UpstreamError> {
        Err(Self::unavailable())
    }
}
