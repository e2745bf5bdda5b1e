//! Reset command - delete every user, follow and message

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use warbler_core::{Event, LogEvent};

use super::{get_context, record};
use crate::output;

pub fn run(force: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if !force {
        println!(
            "\n{}",
            format!(
                "This will delete {} users, {} messages and {} follows.",
                status.total_users, status.total_messages, status.total_follows
            )
            .yellow()
        );

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            output::info("Cancelled");
            return Ok(());
        }
    }

    ctx.directory.reset()?;
    record(LogEvent::new(Event::DirectoryReset, "reset"));
    output::success("Directory cleared");

    Ok(())
}
