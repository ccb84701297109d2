use relgate_core::{BumpKind, ChangeDescriptor, ChangeType, VersionDecision};
use semver::Version;

/// Strongest bump implied by a set of descriptors.
///
/// Any breaking descriptor triggers a major bump regardless of its declared
/// type; otherwise features trigger minor and fixes patch. Chore, docs and
/// other changes on their own trigger nothing. The fold is a max over
/// [`BumpKind`] precedence, so descriptor order never affects the result.
#[must_use]
pub fn required_bump<'a>(descriptors: impl IntoIterator<Item = &'a ChangeDescriptor>) -> BumpKind {
    descriptors
        .into_iter()
        .map(|d| {
            if d.breaking {
                BumpKind::Major
            } else {
                match d.kind {
                    ChangeType::Feature => BumpKind::Minor,
                    ChangeType::Fix => BumpKind::Patch,
                    ChangeType::Chore | ChangeType::Docs | ChangeType::Other => BumpKind::None,
                }
            }
        })
        .max()
        .unwrap_or(BumpKind::None)
}

/// Pre-1.0 policy: while the major version is 0, a major trigger becomes a
/// minor bump. This is explicit policy, not an artifact of the arithmetic.
#[must_use]
pub fn effective_bump(previous: &Version, bump: BumpKind) -> BumpKind {
    if bump == BumpKind::Major && previous.major == 0 {
        BumpKind::Minor
    } else {
        bump
    }
}

/// Applies `bump` to `version` with plain semver arithmetic.
#[must_use]
pub fn bump_version(version: &Version, bump: BumpKind) -> Version {
    let mut new_version = version.clone();

    match bump {
        BumpKind::Major => {
            new_version.major += 1;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpKind::Minor => {
            new_version.minor += 1;
            new_version.patch = 0;
        }
        BumpKind::Patch => {
            new_version.patch += 1;
        }
        BumpKind::None => {}
    }

    new_version
}

/// Folds descriptors and the last released version into a full decision.
/// The recorded bump kind is the effective one after pre-1.0 mapping.
#[must_use]
pub fn decide<'a>(
    previous: &Version,
    descriptors: impl IntoIterator<Item = &'a ChangeDescriptor>,
) -> VersionDecision {
    let bump = effective_bump(previous, required_bump(descriptors));
    let next = bump_version(previous, bump);

    VersionDecision {
        previous: previous.clone(),
        next,
        bump,
    }
}
