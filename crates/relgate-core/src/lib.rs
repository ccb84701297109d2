mod deadline;
mod hash;
mod types;

pub use deadline::{Deadline, DeadlineExpired};
pub use hash::ContentHash;
pub use types::{
    BumpKind, ChangeDescriptor, ChangeType, ReleaseEvent, SourceRange, VersionDecision,
};
