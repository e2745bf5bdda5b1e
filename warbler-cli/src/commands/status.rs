//! Status command - show directory status and summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Directory Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Users", &status.total_users.to_string()]);
    table.add_row(vec!["Messages", &status.total_messages.to_string()]);
    table.add_row(vec!["Follows", &status.total_follows.to_string()]);

    println!("{}", table);

    if let Some(path) = ctx.repository.db_path() {
        println!();
        println!("{}", format!("Database: {}", path.display()).dimmed());
    }

    Ok(())
}
