use relgate_engine::{Coordinator, ReleaseState, RunOptions};

use crate::commands::CommandContext;
use crate::error::Result;
use crate::output::{ConsolePublish, ConsoleReview};

pub(crate) fn run(context: &CommandContext, target: &str) -> Result<()> {
    let coordinator = Coordinator::new(
        &context.repo,
        &context.store,
        ConsoleReview,
        ConsolePublish,
    );

    let status = coordinator.status(target, &RunOptions::default())?;

    match &status.marker {
        Some(marker) => println!(
            "Last published: {} at {} ({})",
            marker.version, marker.source_ref, marker.published_at
        ),
        None => println!("Last published: none"),
    }

    match status.state {
        ReleaseState::Idle => println!("State: idle"),
        ReleaseState::Proposed => println!("State: proposed"),
    }

    if let Some(pending) = &status.pending {
        println!(
            "Pending: {} -> {} (approval hash {})",
            pending.decision.previous,
            pending.decision.next,
            pending.content_hash.short()
        );
        println!("Range: {}", pending.source_range);
    }

    Ok(())
}
