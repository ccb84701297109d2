use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use relgate_core::{ContentHash, SourceRange, VersionDecision};

/// Last published release for a target: the version that went out and the
/// commit it was computed up to. The next run walks history from this ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedMarker {
    pub version: Version,
    pub source_ref: String,
    pub published_at: DateTime<Utc>,
}

/// A computed, not-yet-approved release proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRelease {
    pub target: String,
    pub decision: VersionDecision,
    pub changelog: String,
    pub source_range: SourceRange,
    pub content_hash: ContentHash,
    pub created_at: DateTime<Utc>,
}

/// Full durable record for one target id.
/// File: `<state_dir>/<target>.toml`
///
/// `revision` increments on every write and backs the compare-and-swap on
/// upsert: a writer that read revision N may only replace the record while
/// it is still at revision N.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    #[serde(default)]
    pub revision: u64,
    pub marker: Option<PublishedMarker>,
    pub pending: Option<PendingRelease>,
}
