//! Builder that validates collaborators and initialises a manager.

use std::sync::Arc;
use std::time::Duration;

use crate::github::UpstreamClient;
use crate::model::{PullRequestState, WatchedRepository};
use crate::persistence::CacheStore;
use crate::telemetry::TelemetrySink;

use super::ManagerError;
use super::manager::RepositoryManager;

/// Pacing interval used when the builder is not given one.
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(100);

/// Collects collaborators for a [`RepositoryManager`].
///
/// # Example
///
/// ```no_run
/// # async fn demo(
/// #     repository: repowatch::model::WatchedRepository,
/// #     upstream: std::sync::Arc<dyn repowatch::github::UpstreamClient>,
/// # ) -> Result<(), repowatch::repository::ManagerError> {
/// use std::sync::Arc;
///
/// use repowatch::persistence::FilesystemCacheStore;
/// use repowatch::repository::RepositoryManager;
/// use repowatch::telemetry::NoopTelemetrySink;
///
/// let manager = RepositoryManager::builder(repository)
///     .upstream(upstream)
///     .cache_store(Arc::new(FilesystemCacheStore::new(".repowatch")))
///     .telemetry(Arc::new(NoopTelemetrySink))
///     .pacing_interval_millis(250)
///     .refresh_on_start(true)
///     .initialize()
///     .await?;
/// println!("{} pull requests cached", manager.count().await);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct RepositoryManagerBuilder {
    repository: WatchedRepository,
    upstream: Option<Arc<dyn UpstreamClient>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    pacing: Result<Duration, i64>,
    refresh_on_start: bool,
}

impl RepositoryManagerBuilder {
    pub(super) const fn new(repository: WatchedRepository) -> Self {
        Self {
            repository,
            upstream: None,
            cache_store: None,
            telemetry: None,
            pacing: Ok(DEFAULT_PACING_INTERVAL),
            refresh_on_start: false,
        }
    }

    /// Sets the client used to list pull requests and fill comment graphs.
    pub fn upstream(mut self, upstream: Arc<dyn UpstreamClient>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Sets the store the snapshot is loaded from and persisted to.
    pub fn cache_store(mut self, cache_store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(cache_store);
        self
    }

    /// Sets the sink for operational events.
    pub fn telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Sets the delay observed after every comment graph fill.
    pub const fn pacing_interval(mut self, interval: Duration) -> Self {
        self.pacing = Ok(interval);
        self
    }

    /// Sets the pacing delay in milliseconds. Negative values are rejected by
    /// [`initialize`](Self::initialize).
    pub fn pacing_interval_millis(mut self, millis: i64) -> Self {
        self.pacing = u64::try_from(millis)
            .map(Duration::from_millis)
            .map_err(|_| millis);
        self
    }

    /// Runs one refresh of closed pull requests before the manager is
    /// returned.
    pub const fn refresh_on_start(mut self, refresh: bool) -> Self {
        self.refresh_on_start = refresh;
        self
    }

    /// Validates the collaborators, loads the persisted snapshot and
    /// optionally refreshes from upstream.
    ///
    /// A snapshot that cannot be loaded is logged and the manager starts
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::MissingDependency`] or
    /// [`ManagerError::NegativePacingInterval`] before any I/O, and any
    /// error from the start-up refresh.
    pub async fn initialize(self) -> Result<RepositoryManager, ManagerError> {
        let upstream = self.upstream.ok_or(ManagerError::MissingDependency {
            dependency: "upstream client",
        })?;
        let cache_store = self.cache_store.ok_or(ManagerError::MissingDependency {
            dependency: "cache store",
        })?;
        let telemetry = self.telemetry.ok_or(ManagerError::MissingDependency {
            dependency: "telemetry sink",
        })?;
        let pacing_interval = self
            .pacing
            .map_err(|millis| ManagerError::NegativePacingInterval { millis })?;

        let manager = RepositoryManager::new(
            self.repository,
            upstream,
            cache_store,
            telemetry,
            pacing_interval,
        );
        manager.load_snapshot().await;

        if self.refresh_on_start {
            manager
                .refresh_from_upstream(PullRequestState::Closed)
                .await?;
        }

        Ok(manager)
    }
}
