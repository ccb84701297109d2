use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use relgate_core::{ChangeDescriptor, ChangeType};

use crate::format::format_entry;

/// Fixed ordering of changelog sections: breaking changes surface first.
pub const SECTION_ORDER: [SectionKind; 4] = [
    SectionKind::Breaking,
    SectionKind::Feature,
    SectionKind::Fix,
    SectionKind::Other,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Breaking,
    Feature,
    Fix,
    Other,
}

impl SectionKind {
    fn for_declared_type(kind: ChangeType) -> Self {
        match kind {
            ChangeType::Feature => Self::Feature,
            ChangeType::Fix => Self::Fix,
            ChangeType::Chore | ChangeType::Docs | ChangeType::Other => Self::Other,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breaking => "Breaking Changes",
            Self::Feature => "Features",
            Self::Fix => "Fixes",
            Self::Other => "Other Changes",
        };
        write!(f, "{s}")
    }
}

/// Ordered grouping of rendered changelog entries.
///
/// Sections follow [`SECTION_ORDER`]; entries within a section keep the
/// order of the input descriptors (newest first, as the history walker
/// yields them). Breaking descriptors appear in the breaking section and
/// again under their declared category, so the risk is visible up front
/// without losing the categorized view. Empty sections are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSection {
    sections: IndexMap<SectionKind, Vec<String>>,
}

impl ChangelogSection {
    #[must_use]
    pub fn build(descriptors: &[ChangeDescriptor]) -> Self {
        let mut sections: IndexMap<SectionKind, Vec<String>> = IndexMap::new();

        for kind in SECTION_ORDER {
            let entries: Vec<String> = descriptors
                .iter()
                .filter(|d| match kind {
                    SectionKind::Breaking => d.breaking,
                    declared => SectionKind::for_declared_type(d.kind) == declared,
                })
                .map(format_entry)
                .collect();

            if !entries.is_empty() {
                sections.insert(kind, entries);
            }
        }

        Self { sections }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    pub fn entries(&self, kind: SectionKind) -> Option<&[String]> {
        self.sections.get(&kind).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &[String])> {
        self.sections.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feat(id: &str, summary: &str) -> ChangeDescriptor {
        ChangeDescriptor::new(id, ChangeType::Feature, summary)
    }

    fn fix(id: &str, summary: &str) -> ChangeDescriptor {
        ChangeDescriptor::new(id, ChangeType::Fix, summary)
    }

    #[test]
    fn groups_by_declared_type() {
        let descriptors = [feat("aaaaaaa", "add export"), fix("bbbbbbb", "null check")];

        let section = ChangelogSection::build(&descriptors);

        assert_eq!(
            section.entries(SectionKind::Feature),
            Some(&["add export (aaaaaaa)".to_string()][..])
        );
        assert_eq!(
            section.entries(SectionKind::Fix),
            Some(&["null check (bbbbbbb)".to_string()][..])
        );
    }

    #[test]
    fn feature_section_precedes_fix_section() {
        let descriptors = [fix("bbbbbbb", "null check"), feat("aaaaaaa", "add export")];

        let section = ChangelogSection::build(&descriptors);
        let kinds: Vec<SectionKind> = section.iter().map(|(k, _)| k).collect();

        assert_eq!(kinds, vec![SectionKind::Feature, SectionKind::Fix]);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let descriptors = [fix("bbbbbbb", "null check")];

        let section = ChangelogSection::build(&descriptors);

        assert_eq!(section.entries(SectionKind::Feature), None);
        assert_eq!(section.entries(SectionKind::Breaking), None);
        assert_eq!(section.entries(SectionKind::Other), None);
    }

    #[test]
    fn breaking_entries_listed_first_and_under_declared_type() {
        let descriptors = [
            feat("aaaaaaa", "remove legacy API").with_breaking(true),
            feat("bbbbbbb", "add export"),
        ];

        let section = ChangelogSection::build(&descriptors);
        let kinds: Vec<SectionKind> = section.iter().map(|(k, _)| k).collect();

        assert_eq!(kinds, vec![SectionKind::Breaking, SectionKind::Feature]);
        assert_eq!(
            section.entries(SectionKind::Breaking),
            Some(&["remove legacy API (aaaaaaa)".to_string()][..])
        );
        // Also counted under its declared category.
        assert_eq!(
            section.entries(SectionKind::Feature),
            Some(
                &[
                    "remove legacy API (aaaaaaa)".to_string(),
                    "add export (bbbbbbb)".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn chore_and_docs_fold_into_other() {
        let descriptors = [
            ChangeDescriptor::new("aaaaaaa", ChangeType::Chore, "bump deps"),
            ChangeDescriptor::new("bbbbbbb", ChangeType::Docs, "fix typo"),
        ];

        let section = ChangelogSection::build(&descriptors);

        assert_eq!(
            section.entries(SectionKind::Other),
            Some(
                &[
                    "bump deps (aaaaaaa)".to_string(),
                    "fix typo (bbbbbbb)".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn entry_order_follows_input_order() {
        let descriptors = [
            fix("ccccccc", "newest"),
            fix("bbbbbbb", "middle"),
            fix("aaaaaaa", "oldest"),
        ];

        let section = ChangelogSection::build(&descriptors);

        assert_eq!(
            section.entries(SectionKind::Fix),
            Some(
                &[
                    "newest (ccccccc)".to_string(),
                    "middle (bbbbbbb)".to_string(),
                    "oldest (aaaaaaa)".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn no_descriptors_yields_empty_section() {
        let section = ChangelogSection::build(&[]);

        assert!(section.is_empty());
    }
}
