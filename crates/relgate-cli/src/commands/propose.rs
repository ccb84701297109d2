use relgate_engine::{Coordinator, RunOptions, RunOutcome};

use crate::commands::CommandContext;
use crate::error::Result;
use crate::output::{ConsolePublish, ConsoleReview};

pub(crate) fn run(context: &CommandContext, target: &str, options: &RunOptions) -> Result<()> {
    let coordinator = Coordinator::new(
        &context.repo,
        &context.store,
        ConsoleReview,
        ConsolePublish,
    );

    match coordinator.run(target, options)? {
        RunOutcome::NoChange => {
            println!("No release-worthy commits for {target}.");
        }
        RunOutcome::Unchanged(pending) => {
            println!(
                "Proposal for {target} is up to date: {} (approval hash {})",
                pending.decision.next,
                pending.content_hash.short()
            );
        }
        // The review surface already printed the proposal.
        RunOutcome::Proposed(_) => {}
    }

    Ok(())
}
