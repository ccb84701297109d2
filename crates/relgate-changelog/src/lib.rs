mod format;
mod section;

pub use format::{format_entry, render_release};
pub use section::{ChangelogSection, SectionKind};
