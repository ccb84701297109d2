//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use relgate_core::{ContentHash, Deadline, ReleaseEvent};
use relgate_git::RawCommit;
use relgate_state::{PendingRelease, PublishedMarker, TargetState};

use crate::error::EngineError;
use crate::traits::{HistoryProvider, PublishSink, ReviewSurface, StateStore};
use crate::Result;

/// Fixed commit history. Commits are held newest first, matching the walk
/// order of the git-backed provider.
pub struct MockHistory {
    commits: Vec<RawCommit>,
    head: String,
}

impl MockHistory {
    #[must_use]
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            commits: Vec::new(),
            head: head.into(),
        }
    }

    /// Prepends a commit, making it the newest. The head ref moves to it.
    #[must_use]
    pub fn with_commit(mut self, id: impl Into<String>, message: impl Into<String>) -> Self {
        let id = id.into();
        self.head.clone_from(&id);
        let seconds = 1_700_000_000 + i64::try_from(self.commits.len()).unwrap_or(0);
        self.commits.insert(
            0,
            RawCommit {
                id,
                message: message.into(),
                timestamp: Utc.timestamp_opt(seconds, 0).single().unwrap_or_else(Utc::now),
            },
        );
        self
    }

    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }
}

impl HistoryProvider for MockHistory {
    fn resolve(&self, refspec: &str) -> Result<String> {
        if refspec == "HEAD" {
            return Ok(self.head.clone());
        }
        if self.commits.iter().any(|c| c.id == refspec) {
            return Ok(refspec.to_string());
        }
        Err(EngineError::HistoryUnavailable {
            refspec: refspec.to_string(),
        })
    }

    fn list_commits(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
        deadline: &Deadline,
    ) -> Result<Vec<RawCommit>> {
        deadline
            .check("walk history")
            .map_err(|e| EngineError::Timeout { phase: e.phase })?;

        let to = self.resolve(to_inclusive)?;
        let start = self
            .commits
            .iter()
            .position(|c| c.id == to)
            .ok_or_else(|| EngineError::HistoryUnavailable {
                refspec: to.clone(),
            })?;

        let mut result = Vec::new();
        for commit in &self.commits[start..] {
            if Some(commit.id.as_str()) == from_exclusive {
                return Ok(result);
            }
            result.push(commit.clone());
        }

        if let Some(from) = from_exclusive {
            if !self.commits.iter().any(|c| c.id == from) {
                return Err(EngineError::HistoryUnavailable {
                    refspec: from.to_string(),
                });
            }
        }
        Ok(result)
    }
}

/// In-memory [`StateStore`] with the same revision CAS semantics as the
/// file-backed store, plus injectable write conflicts for race tests.
#[derive(Default)]
pub struct MemoryStateStore {
    records: Mutex<HashMap<String, TargetState>>,
    inject_conflicts: Mutex<u32>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` upserts fail with a write conflict.
    pub fn inject_write_conflicts(&self, count: u32) {
        if let Ok(mut n) = self.inject_conflicts.lock() {
            *n = count;
        }
    }

    #[must_use]
    pub fn revision(&self, target: &str) -> u64 {
        self.records
            .lock()
            .map(|r| r.get(target).map_or(0, |s| s.revision))
            .unwrap_or(0)
    }
}

impl StateStore for MemoryStateStore {
    fn snapshot(&self, target: &str, deadline: &Deadline) -> Result<TargetState> {
        deadline
            .check("read state")
            .map_err(|e| EngineError::Timeout { phase: e.phase })?;
        Ok(self
            .records
            .lock()
            .map(|r| r.get(target).cloned().unwrap_or_default())
            .unwrap_or_default())
    }

    fn upsert_pending(
        &self,
        target: &str,
        expected_revision: u64,
        pending: PendingRelease,
        deadline: &Deadline,
    ) -> Result<()> {
        deadline
            .check("write state")
            .map_err(|e| EngineError::Timeout { phase: e.phase })?;

        if let Ok(mut n) = self.inject_conflicts.lock() {
            if *n > 0 {
                *n -= 1;
                return Err(EngineError::WriteConflict {
                    target: target.to_string(),
                    attempts: 1,
                });
            }
        }

        let mut records = self.records.lock().map_err(|_| EngineError::Io(
            std::io::Error::other("state mutex poisoned"),
        ))?;
        let state = records.entry(target.to_string()).or_default();
        if state.revision != expected_revision {
            return Err(EngineError::WriteConflict {
                target: target.to_string(),
                attempts: 1,
            });
        }
        state.revision += 1;
        state.pending = Some(pending);
        Ok(())
    }

    fn clear_pending(&self, target: &str, deadline: &Deadline) -> Result<()> {
        deadline
            .check("write state")
            .map_err(|e| EngineError::Timeout { phase: e.phase })?;

        let mut records = self.records.lock().map_err(|_| EngineError::Io(
            std::io::Error::other("state mutex poisoned"),
        ))?;
        if let Some(state) = records.get_mut(target) {
            if state.pending.is_some() {
                state.revision += 1;
                state.pending = None;
            }
        }
        Ok(())
    }

    fn commit_release(
        &self,
        target: &str,
        expected_hash: &ContentHash,
        marker: PublishedMarker,
        deadline: &Deadline,
    ) -> Result<()> {
        deadline
            .check("write state")
            .map_err(|e| EngineError::Timeout { phase: e.phase })?;

        let mut records = self.records.lock().map_err(|_| EngineError::Io(
            std::io::Error::other("state mutex poisoned"),
        ))?;
        let state = records.entry(target.to_string()).or_default();
        match &state.pending {
            Some(pending) if pending.content_hash == *expected_hash => {}
            _ => {
                return Err(EngineError::StaleApproval {
                    target: target.to_string(),
                });
            }
        }
        state.revision += 1;
        state.marker = Some(marker);
        state.pending = None;
        Ok(())
    }
}

/// Records every presented proposal.
#[derive(Default)]
pub struct MockReviewSurface {
    presented: Mutex<Vec<(String, PendingRelease)>>,
}

impl MockReviewSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn presented(&self) -> Vec<(String, PendingRelease)> {
        self.presented.lock().map(|p| p.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn presented_count(&self) -> usize {
        self.presented.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl ReviewSurface for MockReviewSurface {
    fn present(&self, target: &str, pending: &PendingRelease) -> Result<()> {
        if let Ok(mut presented) = self.presented.lock() {
            presented.push((target.to_string(), pending.clone()));
        }
        Ok(())
    }
}

/// Records every emitted release event; can be told to fail delivery.
#[derive(Default)]
pub struct MockPublishSink {
    events: Mutex<Vec<ReleaseEvent>>,
    fail_delivery: Mutex<bool>,
}

impl MockPublishSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_delivery(&self) {
        if let Ok(mut fail) = self.fail_delivery.lock() {
            *fail = true;
        }
    }

    #[must_use]
    pub fn events(&self) -> Vec<ReleaseEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl PublishSink for MockPublishSink {
    fn release_created(&self, event: &ReleaseEvent) -> Result<()> {
        if let Ok(mut fail) = self.fail_delivery.lock() {
            if *fail {
                *fail = false;
                return Err(EngineError::Io(std::io::Error::other(
                    "publish sink unavailable",
                )));
            }
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }
}
