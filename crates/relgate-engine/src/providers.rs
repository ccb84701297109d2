//! Production implementations of the engine's trait seams.

use relgate_core::{ContentHash, Deadline};
use relgate_git::{RawCommit, Repository};
use relgate_state::{FileStateStore, PendingRelease, PublishedMarker, TargetState};

use crate::traits::{HistoryProvider, StateStore};
use crate::Result;

impl HistoryProvider for Repository {
    fn resolve(&self, refspec: &str) -> Result<String> {
        Ok(Repository::resolve(self, refspec)?)
    }

    fn list_commits(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
        deadline: &Deadline,
    ) -> Result<Vec<RawCommit>> {
        Ok(Repository::list_commits(
            self,
            from_exclusive,
            to_inclusive,
            deadline,
        )?)
    }
}

impl StateStore for FileStateStore {
    fn snapshot(&self, target: &str, deadline: &Deadline) -> Result<TargetState> {
        Ok(FileStateStore::snapshot(self, target, deadline)?)
    }

    fn upsert_pending(
        &self,
        target: &str,
        expected_revision: u64,
        pending: PendingRelease,
        deadline: &Deadline,
    ) -> Result<()> {
        Ok(FileStateStore::upsert_pending(
            self,
            target,
            expected_revision,
            pending,
            deadline,
        )?)
    }

    fn clear_pending(&self, target: &str, deadline: &Deadline) -> Result<()> {
        Ok(FileStateStore::clear_pending(self, target, deadline)?)
    }

    fn commit_release(
        &self,
        target: &str,
        expected_hash: &ContentHash,
        marker: PublishedMarker,
        deadline: &Deadline,
    ) -> Result<()> {
        Ok(FileStateStore::commit_release(
            self,
            target,
            expected_hash,
            marker,
            deadline,
        )?)
    }
}
