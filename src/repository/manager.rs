//! In-memory pull request cache with the refresh-from-upstream protocol.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::github::UpstreamClient;
use crate::model::{Comment, PullRequest, PullRequestState, WatchedRepository};
use crate::persistence::CacheStore;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::ManagerError;
use super::builder::RepositoryManagerBuilder;

/// Counts reported by one [`RepositoryManager::refresh_from_upstream`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshOutcome {
    /// Pull requests returned by the upstream listing.
    pub listed: usize,
    /// Pull requests that were unknown or not yet fully interrogated.
    pub candidates: usize,
    /// Candidates whose comment graph was filled and merged.
    pub completed: usize,
}

impl RefreshOutcome {
    /// Returns true when a fill failure ended the batch before every
    /// candidate was attempted.
    #[must_use]
    pub const fn stopped_early(&self) -> bool {
        self.completed < self.candidates
    }
}

/// Owns the cached pull request history of one watched repository.
///
/// The map is guarded by a single exclusive lock that is never held across
/// network calls or persistence. Overlapping refreshes are serialised by a
/// separate refresh gate that readers never take.
pub struct RepositoryManager {
    repository: WatchedRepository,
    upstream: Arc<dyn UpstreamClient>,
    cache_store: Arc<dyn CacheStore>,
    telemetry: Arc<dyn TelemetrySink>,
    pacing_interval: Duration,
    pull_requests: Mutex<BTreeMap<u64, PullRequest>>,
    refresh_gate: Mutex<()>,
}

impl RepositoryManager {
    /// Starts building a manager for `repository`.
    pub const fn builder(repository: WatchedRepository) -> RepositoryManagerBuilder {
        RepositoryManagerBuilder::new(repository)
    }

    pub(super) fn new(
        repository: WatchedRepository,
        upstream: Arc<dyn UpstreamClient>,
        cache_store: Arc<dyn CacheStore>,
        telemetry: Arc<dyn TelemetrySink>,
        pacing_interval: Duration,
    ) -> Self {
        Self {
            repository,
            upstream,
            cache_store,
            telemetry,
            pacing_interval,
            pull_requests: Mutex::new(BTreeMap::new()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// The repository this manager caches.
    #[must_use]
    pub const fn repository(&self) -> &WatchedRepository {
        &self.repository
    }

    /// Delay observed after every comment graph fill.
    #[must_use]
    pub const fn pacing_interval(&self) -> Duration {
        self.pacing_interval
    }

    /// Number of cached pull requests.
    pub async fn count(&self) -> usize {
        self.pull_requests.lock().await.len()
    }

    /// Copy of the cached pull request with the given number.
    pub async fn get_by_number(&self, number: u64) -> Option<PullRequest> {
        self.pull_requests.lock().await.get(&number).cloned()
    }

    /// Copies of every cached pull request in ascending number order.
    pub async fn get_all(&self) -> Vec<PullRequest> {
        self.pull_requests.lock().await.values().cloned().collect()
    }

    /// Copies of every cached comment, pull request by pull request.
    pub async fn get_all_comments(&self) -> Vec<Comment> {
        self.pull_requests
            .lock()
            .await
            .values()
            .flat_map(PullRequest::all_comments)
            .cloned()
            .collect()
    }

    /// Brings the cache up to date with upstream.
    ///
    /// Lists pull requests matching `state`, then fills the comment graph of
    /// every pull request that is unknown or incomplete, one at a time and
    /// oldest first, sleeping for the pacing interval after each attempt. The
    /// first failed fill ends the batch; later candidates are retried by the
    /// next refresh. Completed pull requests are merged and the full snapshot
    /// is persisted. With nothing completed, persistence is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Upstream`] when the listing fails (nothing is
    /// merged) and [`ManagerError::Persistence`] when saving the merged
    /// snapshot fails.
    pub async fn refresh_from_upstream(
        &self,
        state: PullRequestState,
    ) -> Result<RefreshOutcome, ManagerError> {
        let _gate = self.refresh_gate.lock().await;
        let started = Instant::now();

        let listed = self
            .upstream
            .list_pull_requests(&self.repository, state)
            .await?;
        let listed_count = listed.len();

        let candidates: Vec<PullRequest> = {
            let cache = self.pull_requests.lock().await;
            listed
                .into_iter()
                .filter(|pr| {
                    cache
                        .get(&pr.number)
                        .is_none_or(|cached| !cached.is_fully_interrogated)
                })
                .collect()
        };
        let candidate_count = candidates.len();
        debug!(
            repository = %self.repository.full_name(),
            listed = listed_count,
            candidates = candidate_count,
            "selected refresh candidates"
        );

        let completed = self.fill_candidates(candidates).await;
        let outcome = RefreshOutcome {
            listed: listed_count,
            candidates: candidate_count,
            completed: completed.len(),
        };

        if !completed.is_empty() {
            self.merge(completed).await;
            self.persist().await?;
        }

        info!(
            repository = %self.repository.full_name(),
            listed = outcome.listed,
            candidates = outcome.candidates,
            completed = outcome.completed,
            elapsed_ms = millis(started.elapsed()),
            "refresh complete"
        );
        self.telemetry.record(TelemetryEvent::RefreshCompleted {
            repository: self.repository.full_name(),
            listed: to_u64(outcome.listed),
            candidates: to_u64(outcome.candidates),
            completed: to_u64(outcome.completed),
        });
        Ok(outcome)
    }

    async fn fill_candidates(&self, candidates: Vec<PullRequest>) -> Vec<PullRequest> {
        let mut completed = Vec::with_capacity(candidates.len());

        for mut candidate in candidates {
            let started = Instant::now();
            let result = self.upstream.fill_comment_graph(&mut candidate).await;
            tokio::time::sleep(self.pacing_interval).await;

            match result {
                Ok(()) => {
                    candidate.is_fully_interrogated = true;
                    debug!(
                        repository = %self.repository.full_name(),
                        pull_request = candidate.number,
                        comments = candidate.all_comments().count(),
                        elapsed_ms = millis(started.elapsed()),
                        "filled comment graph"
                    );
                    completed.push(candidate);
                }
                Err(error) => {
                    warn!(
                        repository = %self.repository.full_name(),
                        pull_request = candidate.number,
                        %error,
                        "comment graph fill failed; ending batch"
                    );
                    self.telemetry.record(TelemetryEvent::CommentGraphFetchFailed {
                        repository: self.repository.full_name(),
                        pull_request: candidate.number,
                        message: error.to_string(),
                    });
                    break;
                }
            }
        }

        completed
    }

    /// Inserts or replaces each pull request by number under one lock
    /// acquisition, so readers see the batch entirely or not at all.
    ///
    /// Callers must not pass an incomplete pull request for a number that is
    /// already cached as fully interrogated: the merge does not guard
    /// against that regression.
    pub(super) async fn merge(&self, pull_requests: Vec<PullRequest>) {
        let mut cache = self.pull_requests.lock().await;
        for pull_request in pull_requests {
            cache.insert(pull_request.number, pull_request);
        }
    }

    async fn persist(&self) -> Result<(), ManagerError> {
        let snapshot = self.get_all().await;
        self.cache_store
            .save(
                &snapshot,
                self.repository.owner().as_str(),
                self.repository.name().as_str(),
            )
            .await?;
        Ok(())
    }

    pub(super) async fn load_snapshot(&self) {
        let started = Instant::now();
        let result = self
            .cache_store
            .load(
                self.repository.owner().as_str(),
                self.repository.name().as_str(),
            )
            .await;

        match result {
            Ok(loaded) => {
                let count = {
                    let mut cache = self.pull_requests.lock().await;
                    cache.extend(loaded.into_iter().map(|pr| (pr.number, pr)));
                    cache.len()
                };
                let duration_ms = millis(started.elapsed());
                info!(
                    repository = %self.repository.full_name(),
                    pull_requests = count,
                    duration_ms,
                    "loaded cached snapshot"
                );
                self.telemetry.record(TelemetryEvent::CacheLoaded {
                    repository: self.repository.full_name(),
                    pull_requests: to_u64(count),
                    duration_ms,
                });
            }
            Err(error) => {
                warn!(
                    repository = %self.repository.full_name(),
                    %error,
                    "cached snapshot unavailable; starting empty"
                );
                self.telemetry.record(TelemetryEvent::CacheLoadFailed {
                    repository: self.repository.full_name(),
                    message: error.to_string(),
                });
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
