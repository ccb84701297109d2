use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Category of a single change, as declared in its commit header.
///
/// A breaking change keeps its declared type; the breaking flag lives on
/// [`ChangeDescriptor`] so the changelog can list the entry under both its
/// breaking section and its original category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Feature,
    Fix,
    Chore,
    Docs,
    Other,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Feature => "feature",
            Self::Fix => "fix",
            Self::Chore => "chore",
            Self::Docs => "docs",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// Magnitude of the version increase implied by a set of changes.
///
/// Ordered so that `max()` over a collection picks the strongest bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

/// Structured description of a single commit, produced by classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    /// Commit identifier (full hex sha for git-backed history).
    pub id: String,
    pub kind: ChangeType,
    pub scope: Option<String>,
    pub summary: String,
    pub breaking: bool,
}

impl ChangeDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ChangeType, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            scope: None,
            summary: summary.into(),
            breaking: false,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    /// Abbreviated commit identifier for rendering.
    #[must_use]
    pub fn short_id(&self) -> &str {
        &self.id[..7.min(self.id.len())]
    }
}

/// Outcome of version calculation for one run.
///
/// Invariant: `next > previous` exactly when `bump != BumpKind::None`,
/// and `next == previous` exactly when `bump == BumpKind::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDecision {
    pub previous: Version,
    pub next: Version,
    pub bump: BumpKind,
}

/// Commit range a proposal was computed from. `from` is exclusive and absent
/// for the very first release; `to` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub from: Option<String>,
    pub to: String,
}

impl SourceRange {
    #[must_use]
    pub fn new(from: Option<String>, to: impl Into<String>) -> Self {
        Self {
            from,
            to: to.into(),
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{from}..{}", self.to),
            None => write!(f, "..{}", self.to),
        }
    }
}

/// Emitted exactly once per approved proposal; consumed by the external
/// publish executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    pub target: String,
    pub version: Version,
    pub changelog: String,
    pub source_range: SourceRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_kind_ordering_none_is_smallest() {
        assert!(BumpKind::None < BumpKind::Patch);
        assert!(BumpKind::None < BumpKind::Minor);
        assert!(BumpKind::None < BumpKind::Major);
    }

    #[test]
    fn bump_kind_ordering_major_is_largest() {
        assert!(BumpKind::Major > BumpKind::Minor);
        assert!(BumpKind::Minor > BumpKind::Patch);
    }

    #[test]
    fn bump_kind_max_returns_strongest() {
        let bumps = [BumpKind::Patch, BumpKind::Major, BumpKind::None];
        assert_eq!(bumps.iter().max(), Some(&BumpKind::Major));
    }

    #[test]
    fn short_id_truncates_full_sha() {
        let descriptor = ChangeDescriptor::new(
            "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678",
            ChangeType::Fix,
            "null check",
        );

        assert_eq!(descriptor.short_id(), "a1b2c3d");
    }

    #[test]
    fn short_id_keeps_short_identifiers_whole() {
        let descriptor = ChangeDescriptor::new("abc", ChangeType::Fix, "null check");

        assert_eq!(descriptor.short_id(), "abc");
    }

    #[test]
    fn source_range_display_with_from() {
        let range = SourceRange::new(Some("aaa".to_string()), "bbb");

        assert_eq!(range.to_string(), "aaa..bbb");
    }

    #[test]
    fn source_range_display_from_root() {
        let range = SourceRange::new(None, "bbb");

        assert_eq!(range.to_string(), "..bbb");
    }
}
