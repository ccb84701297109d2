mod error;
mod record;
mod store;

pub use error::StoreError;
pub use record::{PendingRelease, PublishedMarker, TargetState};
pub use store::FileStateStore;

pub type Result<T> = std::result::Result<T, StoreError>;
