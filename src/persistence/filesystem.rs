//! JSON snapshot files under a cache directory.
//!
//! Each repository is stored at `<root>/<owner>/<name>.json` as a pretty
//! printed array of pull requests. Writes go to a temporary sibling first and
//! are renamed into place, so readers never observe a half-written file.

use std::io::ErrorKind;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::debug;

use crate::model::PullRequest;

use super::{CacheStore, PersistenceError, run_blocking};

/// Cache store writing one JSON file per repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemCacheStore {
    root: Utf8PathBuf,
}

impl FilesystemCacheStore {
    /// Creates a store rooted at `root`. The directory is created on first
    /// save.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache directory root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the snapshot file for `owner/name`.
    #[must_use]
    pub fn snapshot_path(&self, owner: &str, name: &str) -> Utf8PathBuf {
        self.root.join(relative_snapshot_path(owner, name))
    }

    fn write_snapshot(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(pull_requests).map_err(|error| {
            PersistenceError::Serialisation {
                message: error.to_string(),
            }
        })?;

        Dir::create_ambient_dir_all(&self.root, ambient_authority()).map_err(|error| {
            PersistenceError::WriteFailed {
                message: format!("failed to create cache directory '{}': {error}", self.root),
            }
        })?;
        let root = self.open_root()?;
        root.create_dir_all(owner)
            .map_err(|error| PersistenceError::WriteFailed {
                message: format!("failed to create '{owner}' under '{}': {error}", self.root),
            })?;

        let target = relative_snapshot_path(owner, name);
        let staging = target.with_extension("json.tmp");
        root.write(&staging, json)
            .map_err(|error| PersistenceError::WriteFailed {
                message: format!("failed to write '{staging}': {error}"),
            })?;
        root.rename(&staging, &root, &target)
            .map_err(|error| PersistenceError::WriteFailed {
                message: format!("failed to move snapshot into '{target}': {error}"),
            })?;

        debug!(path = %self.snapshot_path(owner, name), count = pull_requests.len(), "saved snapshot");
        Ok(())
    }

    fn read_snapshot(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError> {
        let not_found = || PersistenceError::SnapshotNotFound {
            owner: owner.to_owned(),
            name: name.to_owned(),
        };

        let root = match self.open_root() {
            Ok(root) => root,
            Err(_) if !self.root.exists() => return Err(not_found()),
            Err(error) => return Err(error),
        };

        let target = relative_snapshot_path(owner, name);
        let content = match root.read_to_string(&target) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(error) => {
                return Err(PersistenceError::QueryFailed {
                    message: format!("failed to read '{target}': {error}"),
                });
            }
        };

        let mut pull_requests: Vec<PullRequest> =
            serde_json::from_str(&content).map_err(|error| PersistenceError::Serialisation {
                message: format!("'{target}': {error}"),
            })?;
        pull_requests.sort_by_key(|pr| pr.number);
        Ok(pull_requests)
    }

    fn open_root(&self) -> Result<Dir, PersistenceError> {
        Dir::open_ambient_dir(&self.root, ambient_authority()).map_err(|error| {
            PersistenceError::QueryFailed {
                message: format!("failed to open cache directory '{}': {error}", self.root),
            }
        })
    }
}

fn relative_snapshot_path(owner: &str, name: &str) -> Utf8PathBuf {
    Utf8Path::new(owner).join(format!("{name}.json"))
}

#[async_trait]
impl CacheStore for FilesystemCacheStore {
    async fn save(
        &self,
        pull_requests: &[PullRequest],
        owner: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        let store = self.clone();
        let snapshot = pull_requests.to_vec();
        let owner_owned = owner.to_owned();
        let name_owned = name.to_owned();
        run_blocking("save snapshot", move || {
            store.write_snapshot(&snapshot, &owner_owned, &name_owned)
        })
        .await
    }

    async fn load(&self, owner: &str, name: &str) -> Result<Vec<PullRequest>, PersistenceError> {
        let store = self.clone();
        let owner_owned = owner.to_owned();
        let name_owned = name.to_owned();
        run_blocking("load snapshot", move || {
            store.read_snapshot(&owner_owned, &name_owned)
        })
        .await
    }
}
