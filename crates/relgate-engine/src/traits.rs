use relgate_core::{ContentHash, Deadline, ReleaseEvent};
use relgate_git::RawCommit;
use relgate_state::{PendingRelease, PublishedMarker, TargetState};

use crate::Result;

/// Read access to a repository's commit history.
pub trait HistoryProvider {
    /// Resolves a refspec to a full commit id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::HistoryUnavailable`] if the refspec
    /// cannot be resolved.
    fn resolve(&self, refspec: &str) -> Result<String>;

    /// Commits in `(from_exclusive, to_inclusive]`, newest first; `None`
    /// walks from the repository root. Re-walking the same range must yield
    /// the same sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint cannot be resolved or the deadline
    /// expires mid-walk.
    fn list_commits(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
        deadline: &Deadline,
    ) -> Result<Vec<RawCommit>>;
}

/// Where pending releases are surfaced for human review.
pub trait ReviewSurface {
    /// # Errors
    ///
    /// Returns an error if the proposal cannot be surfaced.
    fn present(&self, target: &str, pending: &PendingRelease) -> Result<()>;
}

/// Consumer of approved release events; performs the actual publish.
pub trait PublishSink {
    /// # Errors
    ///
    /// Returns an error if the event cannot be delivered. The coordinator
    /// never retries delivery, so a sink must not partially publish.
    fn release_created(&self, event: &ReleaseEvent) -> Result<()>;
}

/// Durable per-target release state.
///
/// Implementations must serialize read-modify-write per target and replace
/// records whole; `upsert_pending` is a compare-and-swap on the record
/// revision.
pub trait StateStore {
    /// # Errors
    ///
    /// Returns an error if the record cannot be read. Absence is not an
    /// error; it reads as the default record.
    fn snapshot(&self, target: &str, deadline: &Deadline) -> Result<TargetState>;

    /// # Errors
    ///
    /// Returns [`crate::EngineError::WriteConflict`] when the stored record
    /// has moved past `expected_revision`.
    fn upsert_pending(
        &self,
        target: &str,
        expected_revision: u64,
        pending: PendingRelease,
        deadline: &Deadline,
    ) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the record cannot be rewritten.
    fn clear_pending(&self, target: &str, deadline: &Deadline) -> Result<()>;

    /// Atomically advances the last-published marker and clears the pending
    /// release. The stored pending release must still match `expected_hash`
    /// at commit time.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::StaleApproval`] when the pending
    /// release is gone or no longer matches, and an error if the record
    /// cannot be rewritten.
    fn commit_release(
        &self,
        target: &str,
        expected_hash: &ContentHash,
        marker: PublishedMarker,
        deadline: &Deadline,
    ) -> Result<()>;
}

// Shared references forward, so a coordinator can borrow collaborators the
// caller keeps inspecting.

impl<T: HistoryProvider + ?Sized> HistoryProvider for &T {
    fn resolve(&self, refspec: &str) -> Result<String> {
        (**self).resolve(refspec)
    }

    fn list_commits(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
        deadline: &Deadline,
    ) -> Result<Vec<RawCommit>> {
        (**self).list_commits(from_exclusive, to_inclusive, deadline)
    }
}

impl<T: ReviewSurface + ?Sized> ReviewSurface for &T {
    fn present(&self, target: &str, pending: &PendingRelease) -> Result<()> {
        (**self).present(target, pending)
    }
}

impl<T: PublishSink + ?Sized> PublishSink for &T {
    fn release_created(&self, event: &ReleaseEvent) -> Result<()> {
        (**self).release_created(event)
    }
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn snapshot(&self, target: &str, deadline: &Deadline) -> Result<TargetState> {
        (**self).snapshot(target, deadline)
    }

    fn upsert_pending(
        &self,
        target: &str,
        expected_revision: u64,
        pending: PendingRelease,
        deadline: &Deadline,
    ) -> Result<()> {
        (**self).upsert_pending(target, expected_revision, pending, deadline)
    }

    fn clear_pending(&self, target: &str, deadline: &Deadline) -> Result<()> {
        (**self).clear_pending(target, deadline)
    }

    fn commit_release(
        &self,
        target: &str,
        expected_hash: &ContentHash,
        marker: PublishedMarker,
        deadline: &Deadline,
    ) -> Result<()> {
        (**self).commit_release(target, expected_hash, marker, deadline)
    }
}
