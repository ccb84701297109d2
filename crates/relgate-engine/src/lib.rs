mod coordinator;
mod error;
pub mod mocks;
mod providers;
mod traits;

pub use coordinator::{Coordinator, ReleaseState, RunOptions, RunOutcome, TargetStatus};
pub use error::{EngineError, Result};
pub use traits::{HistoryProvider, PublishSink, ReviewSurface, StateStore};
