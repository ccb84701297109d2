use std::time::Duration;

use chrono::Utc;
use semver::Version;
use tracing::debug;

use relgate_changelog::{render_release, ChangelogSection};
use relgate_classify::classify;
use relgate_core::{BumpKind, ChangeDescriptor, ContentHash, Deadline, ReleaseEvent, SourceRange};
use relgate_state::{PendingRelease, PublishedMarker};

use crate::error::EngineError;
use crate::traits::{HistoryProvider, PublishSink, ReviewSurface, StateStore};
use crate::Result;

/// Bounded retry budget for proposals that lose the per-target write race.
const UPSERT_ATTEMPTS: u32 = 3;

/// Shortest approval hash prefix accepted; anything shorter is ambiguous.
const MIN_HASH_PREFIX: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Bound for the whole run; `None` means no timeout.
    pub timeout: Option<Duration>,
    /// Refspec of the current head. Defaults to `HEAD`.
    pub head: Option<String>,
}

/// Result of one coordinator run for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No release-worthy commits; any stale proposal was cleared.
    NoChange,
    /// The stored proposal already matches; nothing was written.
    Unchanged(PendingRelease),
    /// A new or updated proposal was stored and surfaced for review.
    Proposed(PendingRelease),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Idle,
    Proposed,
}

#[derive(Debug, Clone)]
pub struct TargetStatus {
    pub state: ReleaseState,
    pub marker: Option<PublishedMarker>,
    pub pending: Option<PendingRelease>,
}

/// Orchestrates one release decision per target id: walk history, classify,
/// decide the version, build the changelog, reconcile with stored state and,
/// on approval, emit exactly one release event.
pub struct Coordinator<H, S, R, P> {
    history: H,
    store: S,
    review: R,
    publish: P,
}

impl<H, S, R, P> Coordinator<H, S, R, P>
where
    H: HistoryProvider,
    S: StateStore,
    R: ReviewSurface,
    P: PublishSink,
{
    pub fn new(history: H, store: S, review: R, publish: P) -> Self {
        Self {
            history,
            store,
            review,
            publish,
        }
    }

    /// Recomputes the release proposal for `target` and reconciles it with
    /// the stored pending release. Idempotent: re-running without new
    /// commits writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `HistoryUnavailable` for unresolvable refs, `Timeout` when
    /// the run exceeds its deadline, and `WriteConflict` once the retry
    /// budget for the per-target write race is exhausted.
    pub fn run(&self, target: &str, options: &RunOptions) -> Result<RunOutcome> {
        let deadline = deadline_for(options);
        let head = options.head.as_deref().unwrap_or("HEAD");
        let to_ref = self.history.resolve(head)?;

        let mut attempts = 0;
        loop {
            match self.try_run(target, &to_ref, &deadline)? {
                Reconciled::Done(outcome) => return Ok(outcome),
                Reconciled::LostRace => {
                    attempts += 1;
                    if attempts >= UPSERT_ATTEMPTS {
                        return Err(EngineError::WriteConflict {
                            target: target.to_string(),
                            attempts,
                        });
                    }
                    debug!(%target, attempts, "write race lost, recomputing from fresh state");
                }
            }
        }
    }

    fn try_run(&self, target: &str, to_ref: &str, deadline: &Deadline) -> Result<Reconciled> {
        let state = self.store.snapshot(target, deadline)?;

        let (previous, from_ref) = match &state.marker {
            Some(marker) => (marker.version.clone(), Some(marker.source_ref.clone())),
            None => (Version::new(0, 0, 0), None),
        };

        let commits = self
            .history
            .list_commits(from_ref.as_deref(), to_ref, deadline)?;
        let descriptors: Vec<ChangeDescriptor> = commits
            .iter()
            .map(|c| classify(c.id.clone(), &c.message))
            .collect();

        let decision = relgate_version::decide(&previous, &descriptors);
        debug!(
            %target,
            commits = commits.len(),
            bump = %decision.bump,
            "computed version decision"
        );

        if decision.bump == BumpKind::None {
            self.store.clear_pending(target, deadline)?;
            return Ok(Reconciled::Done(RunOutcome::NoChange));
        }

        let section = ChangelogSection::build(&descriptors);
        let changelog = render_release(&decision, &section);
        let source_range = SourceRange::new(from_ref, to_ref);
        let content_hash = ContentHash::of(&decision, &changelog, &source_range);

        if let Some(existing) = &state.pending {
            if existing.content_hash == content_hash && existing.source_range == source_range {
                debug!(%target, hash = %content_hash, "proposal unchanged");
                return Ok(Reconciled::Done(RunOutcome::Unchanged(existing.clone())));
            }
        }

        let pending = PendingRelease {
            target: target.to_string(),
            decision,
            changelog,
            source_range,
            content_hash,
            created_at: Utc::now(),
        };

        match self
            .store
            .upsert_pending(target, state.revision, pending.clone(), deadline)
        {
            Ok(()) => {
                self.review.present(target, &pending)?;
                debug!(%target, version = %pending.decision.next, "proposal stored and presented");
                Ok(Reconciled::Done(RunOutcome::Proposed(pending)))
            }
            Err(EngineError::WriteConflict { .. }) => Ok(Reconciled::LostRace),
            Err(e) => Err(e),
        }
    }

    /// Applies an operator approval for the proposal identified by
    /// `approved_hash` (full digest or a prefix of at least 12 characters).
    /// Emits the release event, then atomically advances the last-published
    /// marker and clears the pending release.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingRelease` when the target has nothing proposed,
    /// `InvalidApprovalHash` when the hash argument is too short to be
    /// unambiguous, and `StaleApproval` when the stored proposal no longer
    /// matches the hash the approval was granted for — checked again at
    /// commit time, so a proposal superseded mid-approval is never
    /// overwritten. Approval is deliberately not idempotent: a second call
    /// after publishing fails.
    pub fn approve(
        &self,
        target: &str,
        approved_hash: &str,
        options: &RunOptions,
    ) -> Result<ReleaseEvent> {
        let deadline = deadline_for(options);
        let state = self.store.snapshot(target, &deadline)?;

        let Some(pending) = state.pending else {
            return Err(EngineError::NoPendingRelease {
                target: target.to_string(),
            });
        };

        if approved_hash.len() < MIN_HASH_PREFIX {
            return Err(EngineError::InvalidApprovalHash {
                hash: approved_hash.to_string(),
            });
        }
        if !pending.content_hash.matches_prefix(approved_hash) {
            return Err(EngineError::StaleApproval {
                target: target.to_string(),
            });
        }

        let event = ReleaseEvent {
            target: target.to_string(),
            version: pending.decision.next.clone(),
            changelog: pending.changelog.clone(),
            source_range: pending.source_range.clone(),
        };

        self.publish.release_created(&event)?;

        let marker = PublishedMarker {
            version: pending.decision.next.clone(),
            source_ref: pending.source_range.to.clone(),
            published_at: Utc::now(),
        };
        self.store
            .commit_release(target, &pending.content_hash, marker, &deadline)?;

        debug!(%target, version = %event.version, "release published");
        Ok(event)
    }

    /// Current state-machine position for `target`, derived from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be read.
    pub fn status(&self, target: &str, options: &RunOptions) -> Result<TargetStatus> {
        let deadline = deadline_for(options);
        let state = self.store.snapshot(target, &deadline)?;

        Ok(TargetStatus {
            state: if state.pending.is_some() {
                ReleaseState::Proposed
            } else {
                ReleaseState::Idle
            },
            marker: state.marker,
            pending: state.pending,
        })
    }
}

enum Reconciled {
    Done(RunOutcome),
    LostRace,
}

fn deadline_for(options: &RunOptions) -> Deadline {
    options.timeout.map_or_else(Deadline::none, Deadline::after)
}
