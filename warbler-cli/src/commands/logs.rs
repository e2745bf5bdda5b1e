//! Logs command - inspect and prune the event log

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use warbler_core::LoggingService;

use super::open_log;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the newest entries
    List {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Only failed commands
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a number of days
    Clear {
        /// Age in days; newer entries are kept
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Show totals and where the log is stored
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = open_log()?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&log, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
        } => clear(&log, older_than_days, force),
        LogsCommands::Stats { json } => stats(&log, json),
    }
}

fn when(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn list(log: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = log.recent(limit, errors)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        output::info("The event log is empty");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["When", "Command", "Event", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            when(&entry.recorded_at),
            entry.command.clone(),
            entry.event.clone(),
            entry
                .error
                .as_deref()
                .map(|e| e.red().to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn clear(log: &LoggingService, older_than_days: u64, force: bool) -> Result<()> {
    if !force
        && !Confirm::new()
            .with_prompt(format!(
                "Delete event log entries older than {} days?",
                older_than_days
            ))
            .default(false)
            .interact()?
    {
        output::info("Cancelled");
        return Ok(());
    }

    let deleted = log.prune_older_than(older_than_days)?;
    output::success(&format!("Removed {} entries", deleted));

    Ok(())
}

fn stats(log: &LoggingService, json: bool) -> Result<()> {
    let stats = log.stats()?;
    let size = std::fs::metadata(log.db_path()).map(|m| m.len()).unwrap_or(0);

    if json {
        let mut value = serde_json::to_value(&stats)?;
        value["path"] = serde_json::json!(log.db_path().display().to_string());
        value["size_bytes"] = serde_json::json!(size);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let span = match (&stats.oldest, &stats.newest) {
        (Some(oldest), Some(newest)) => format!("{} to {}", when(oldest), when(newest)),
        _ => "-".to_string(),
    };

    println!("{}", "Event Log".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Entries".to_string(), stats.total.to_string()]);
    table.add_row(vec!["Failed commands".to_string(), stats.errors.to_string()]);
    table.add_row(vec!["Covers".to_string(), span]);
    table.add_row(vec![
        "File".to_string(),
        format!("{} ({})", log.db_path().display(), output::format_size(size)),
    ]);
    println!("{}", table);

    Ok(())
}
