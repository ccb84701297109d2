//! Console-backed review surface and publish sink.

use relgate_core::ReleaseEvent;
use relgate_engine::{PublishSink, ReviewSurface};
use relgate_state::PendingRelease;

/// Prints proposals to stdout for the operator to inspect.
pub(crate) struct ConsoleReview;

impl ReviewSurface for ConsoleReview {
    fn present(&self, target: &str, pending: &PendingRelease) -> relgate_engine::Result<()> {
        println!(
            "Proposed release for {target}: {} -> {}",
            pending.decision.previous, pending.decision.next
        );
        println!("Range: {}", pending.source_range);
        println!("Approval hash: {}", pending.content_hash.short());
        println!();
        println!("{}", pending.changelog);
        Ok(())
    }
}

/// Prints the release event. Actual publishing (registry upload, release
/// pages) is left to whatever consumes the tag and the printed changelog.
pub(crate) struct ConsolePublish;

impl PublishSink for ConsolePublish {
    fn release_created(&self, event: &ReleaseEvent) -> relgate_engine::Result<()> {
        println!(
            "Released {} {} (range {})",
            event.target, event.version, event.source_range
        );
        Ok(())
    }
}
