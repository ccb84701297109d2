use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use relgate_core::{ContentHash, Deadline};

use crate::error::StoreError;
use crate::record::{PendingRelease, PublishedMarker, TargetState};
use crate::Result;

/// Durable release state, one TOML file per target id.
///
/// Writes go through a per-target mutex and land via temp file + rename, so
/// a record is always replaced whole. `upsert_pending` additionally does a
/// revision compare-and-swap, which catches writers from other processes
/// that raced past the in-process lock.
pub struct FileStateStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStateStore {
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if the state directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Current record for `target`; a missing file is an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn snapshot(&self, target: &str, deadline: &Deadline) -> Result<TargetState> {
        deadline.check("read state")?;
        let lock = self.lock_target(target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load(target)
    }

    /// # Errors
    ///
    /// See [`FileStateStore::snapshot`].
    pub fn pending(&self, target: &str, deadline: &Deadline) -> Result<Option<PendingRelease>> {
        Ok(self.snapshot(target, deadline)?.pending)
    }

    /// # Errors
    ///
    /// See [`FileStateStore::snapshot`].
    pub fn marker(&self, target: &str, deadline: &Deadline) -> Result<Option<PublishedMarker>> {
        Ok(self.snapshot(target, deadline)?.marker)
    }

    /// Replaces the pending release wholesale, guarded by a revision
    /// compare-and-swap: the write succeeds only while the stored record is
    /// still at `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteConflict`] when another writer got there
    /// first.
    pub fn upsert_pending(
        &self,
        target: &str,
        expected_revision: u64,
        pending: PendingRelease,
        deadline: &Deadline,
    ) -> Result<()> {
        deadline.check("write state")?;
        let lock = self.lock_target(target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut state = self.load(target)?;
        if state.revision != expected_revision {
            return Err(StoreError::WriteConflict {
                target: target.to_string(),
            });
        }

        state.revision += 1;
        state.pending = Some(pending);
        self.write(target, &state)
    }

    /// Removes any pending release; no-op if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or rewritten.
    pub fn clear_pending(&self, target: &str, deadline: &Deadline) -> Result<()> {
        deadline.check("write state")?;
        let lock = self.lock_target(target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut state = self.load(target)?;
        if state.pending.is_none() {
            return Ok(());
        }

        state.revision += 1;
        state.pending = None;
        self.write(target, &state)
    }

    /// The atomic `PUBLISHED` transition: advances the last-published marker
    /// and clears the pending release in a single write. The stored pending
    /// release is re-checked against `expected_hash` under the per-target
    /// lock, so a proposal superseded after the approval was granted is
    /// never destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StaleProposal`] when no pending release is
    /// stored or its content hash differs from `expected_hash`.
    pub fn commit_release(
        &self,
        target: &str,
        expected_hash: &ContentHash,
        marker: PublishedMarker,
        deadline: &Deadline,
    ) -> Result<()> {
        deadline.check("write state")?;
        let lock = self.lock_target(target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut state = self.load(target)?;
        match &state.pending {
            Some(pending) if pending.content_hash == *expected_hash => {}
            _ => {
                return Err(StoreError::StaleProposal {
                    target: target.to_string(),
                });
            }
        }

        state.revision += 1;
        state.marker = Some(marker);
        state.pending = None;
        self.write(target, &state)
    }

    fn lock_target(&self, target: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(target.to_string()).or_default())
    }

    fn state_path(&self, target: &str) -> Result<PathBuf> {
        if target.is_empty() || target.contains(['/', '\\']) || target.contains("..") {
            return Err(StoreError::InvalidTarget {
                target: target.to_string(),
            });
        }
        Ok(self.dir.join(format!("{target}.toml")))
    }

    fn load(&self, target: &str) -> Result<TargetState> {
        let path = self.state_path(target)?;
        if !path.exists() {
            return Ok(TargetState::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| StoreError::Parse { path, source })
    }

    fn write(&self, target: &str, state: &TargetState) -> Result<()> {
        let path = self.state_path(target)?;
        let content = toml::to_string(state).map_err(|source| StoreError::Serialize {
            target: target.to_string(),
            source,
        })?;

        write_atomic(&path, &content)
    }
}

/// Write-then-rename so a crash mid-write leaves the previous record intact.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("toml.tmp");

    fs::write(&tmp_path, content).map_err(|source| StoreError::Write {
        path: tmp_path.clone(),
        source,
    })?;

    fs::rename(&tmp_path, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
