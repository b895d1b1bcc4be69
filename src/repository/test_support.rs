//! In-memory collaborators for exercising a repository manager.
//!
//! [`ScriptedUpstream`] serves a fixed listing and fills comment graphs with a
//! single synthetic comment, failing for pull request numbers it was told to.
//! [`InMemoryCacheStore`] keeps saved snapshots in a map and counts saves.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::github::{UpstreamClient, UpstreamError};
use crate::model::test_support::comment;
use crate::model::{PullRequest, PullRequestState, WatchedRepository};
use crate::persistence::{CacheStore, PersistenceError};

/// Upstream client driven entirely by test setup.
#[derive(Debug, Default)]
pub struct ScriptedUpstream {
    listing: Mutex<Vec<PullRequest>>,
    listing_error: Mutex<Option<UpstreamError>>,
    failing: Mutex<HashSet<u64>>,
    list_calls: AtomicUsize,
    fill_calls: Mutex<Vec<u64>>,
}

impl ScriptedUpstream {
    /// Creates a client whose listing returns `listing` in the given order.
    #[must_use]
    pub fn with_listing(listing: Vec<PullRequest>) -> Self {
        Self {
            listing: Mutex::new(listing),
            ..Self::default()
        }
    }

    /// Replaces the listing returned by later calls.
    pub fn set_listing(&self, listing: Vec<PullRequest>) {
        if let Ok(mut guard) = self.listing.lock() {
            *guard = listing;
        }
    }

    /// Makes every later listing fail with `error`.
    pub fn fail_listing(&self, error: UpstreamError) {
        if let Ok(mut guard) = self.listing_error.lock() {
            *guard = Some(error);
        }
    }

    /// Makes fills of pull request `number` fail.
    pub fn fail_fill_for(&self, number: u64) {
        if let Ok(mut guard) = self.failing.lock() {
            guard.insert(number);
        }
    }

    /// Lets every fill succeed again.
    pub fn clear_fill_failures(&self) {
        if let Ok(mut guard) = self.failing.lock() {
            guard.clear();
        }
    }

    /// Number of listing calls made so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Pull request numbers passed to fill, in call order.
    #[must_use]
    pub fn fill_calls(&self) -> Vec<u64> {
        self.fill_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UpstreamClient for ScriptedUpstream {
    async fn list_pull_requests(
        &self,
        _repository: &WatchedRepository,
        _state: PullRequestState,
    ) -> Result<Vec<PullRequest>, UpstreamError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self
            .listing_error
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
        {
            return Err(error);
        }
        Ok(self
            .listing
            .lock()
            .map(|listing| listing.clone())
            .unwrap_or_default())
    }

    async fn fill_comment_graph(
        &self,
        pull_request: &mut PullRequest,
    ) -> Result<(), UpstreamError> {
        let number = pull_request.number;
        if let Ok(mut calls) = self.fill_calls.lock() {
            calls.push(number);
        }
        let fails = self
            .failing
            .lock()
            .is_ok_and(|failing| failing.contains(&number));
        if fails {
            return Err(UpstreamError::Network {
                message: format!("connection reset while filling #{number}"),
            });
        }

        pull_request.review_comments.push(comment(
            number.saturating_mul(100),
            "Looks good to me",
            "reviewer",
        ));
        pull_request.is_fully_interrogated = true;
        Ok(())
    }
}

/// Cache store keeping snapshots in memory.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    snapshots: Mutex<HashMap<(String, String), Vec<PullRequest>>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryCacheStore {
    /// Creates a store that already holds a snapshot for `owner/name`.
    #[must_use]
    pub fn with_snapshot(owner: &str, name: &str, pull_requests: Vec<PullRequest>) -> Self {
        let store = Self::default();
        if let Ok(mut snapshots) = store.snapshots.lock() {
            snapshots.insert((owner.to_owned(), name.to_owned()), pull_requests);
        }
        store
    }

    /// The snapshot last saved for `owner/name`, if any.
    #[must_use]
    pub fn snapshot(&self, owner: &str, name: &str) -> Option<Vec<PullRequest>> {
        self.snapshots
            .lock()
            .ok()
            .and_then(|snapshots| snapshots.get(&(owner.to_owned(), name.to_owned())).cloned())
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes later saves fail.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn save(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed {
                message: "disk full".to_owned(),
            });
        }
        let mut snapshots = self
            .snapshots
            .lock()
            .map_err(|error| PersistenceError::WriteFailed {
                message: error.to_string(),
            })?;
        snapshots.insert((owner.to_owned(), name.to_owned()), pull_requests.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError> {
        let mut snapshot = self.snapshot(owner, name).ok_or_else(|| {
            PersistenceError::SnapshotNotFound {
                owner: owner.to_owned(),
                name: name.to_owned(),
            }
        })?;
        snapshot.sort_by_key(|pr| pr.number);
        Ok(snapshot)
    }
}
