use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{SourceRange, VersionDecision};

/// SHA-256 over a proposal's decision, rendered changelog and source range.
///
/// Two runs that compute the same proposal from the same commit range produce
/// the same hash, which is what makes re-runs and approval staleness checks
/// cheap byte comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    #[must_use]
    pub fn of(decision: &VersionDecision, changelog: &str, range: &SourceRange) -> Self {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, decision.previous.to_string().as_bytes());
        update_field(&mut hasher, decision.next.to_string().as_bytes());
        update_field(&mut hasher, decision.bump.to_string().as_bytes());
        update_field(&mut hasher, changelog.as_bytes());
        hasher.update([u8::from(range.from.is_some())]);
        update_field(&mut hasher, range.from.as_deref().unwrap_or("").as_bytes());
        update_field(&mut hasher, range.to.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    #[must_use]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for operator-facing display.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }

    /// Whether `prefix` unambiguously identifies this hash. An approval may
    /// pass either the full hex digest or a prefix of at least 12 characters.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        prefix.len() >= 12 && self.0.starts_with(prefix)
    }
}

// Length-prefixing keeps field boundaries unambiguous, so distinct inputs
// never concatenate to the same byte stream.
fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    let len = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(bytes);
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}
