use relgate_core::{ChangeDescriptor, VersionDecision};

use crate::section::ChangelogSection;

/// Renders one descriptor as `<scope>: <summary> (<short id>)`, scope
/// omitted when absent.
#[must_use]
pub fn format_entry(descriptor: &ChangeDescriptor) -> String {
    match &descriptor.scope {
        Some(scope) => format!(
            "{scope}: {} ({})",
            descriptor.summary,
            descriptor.short_id()
        ),
        None => format!("{} ({})", descriptor.summary, descriptor.short_id()),
    }
}

/// Renders a full release section, byte-deterministic for identical input.
#[must_use]
pub fn render_release(decision: &VersionDecision, section: &ChangelogSection) -> String {
    let mut output = format!("## [{}]\n", decision.next);

    for (kind, entries) in section.iter() {
        output.push_str("\n### ");
        output.push_str(&kind.to_string());
        output.push('\n');

        for entry in entries {
            output.push_str("\n- ");
            output.push_str(entry);
        }
        output.push('\n');
    }

    output
}
