use relgate_engine::{Coordinator, RunOptions};

use crate::commands::CommandContext;
use crate::error::Result;
use crate::output::{ConsolePublish, ConsoleReview};

pub(crate) fn run(
    context: &CommandContext,
    target: &str,
    hash: &str,
    tag: bool,
    options: &RunOptions,
) -> Result<()> {
    let coordinator = Coordinator::new(
        &context.repo,
        &context.store,
        ConsoleReview,
        ConsolePublish,
    );

    let event = coordinator.approve(target, hash, options)?;

    if tag {
        let name = format!("v{}", event.version);
        let info = context.repo.create_tag_at(
            &name,
            &event.source_range.to,
            &format!("Release {} {}", event.target, event.version),
        )?;
        println!("Tagged {} at {}", info.name, info.target_sha);
    }

    Ok(())
}
