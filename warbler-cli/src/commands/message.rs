//! Message command - post, list and delete messages

use anyhow::Result;
use clap::Subcommand;
use warbler_core::{Event, LogEvent};

use super::{get_context, record, resolve_user};
use crate::output;

#[derive(Subcommand)]
pub enum MessageCommands {
    /// Post a message as a user
    Post {
        /// Author (id or username)
        user: String,
        /// Message text, at most 140 characters
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a user's messages, newest first
    List {
        /// Author (id or username)
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a message by id
    Delete {
        /// Message id
        id: i64,
    },
}

pub fn run(command: MessageCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        MessageCommands::Post { user, text, json } => {
            let user = resolve_user(&ctx, &user)?;
            let message = ctx.message_service.post(user.id, &text)?;
            record(LogEvent::new(Event::MessagePosted, "message post"));

            if json {
                println!("{}", serde_json::to_string_pretty(&message)?);
            } else {
                output::success(&format!("Posted message #{} as {}", message.id, user.username));
            }
        }
        MessageCommands::List { user, json } => {
            let user = resolve_user(&ctx, &user)?;
            let messages = ctx.message_service.messages_for(user.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
                return Ok(());
            }

            if messages.is_empty() {
                output::info(&format!("{} has not posted yet", user.username));
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["ID", "Time", "Text"]);
            for message in messages {
                table.add_row(vec![
                    message.id.to_string(),
                    message.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    message.text,
                ]);
            }
            println!("{}", table);
        }
        MessageCommands::Delete { id } => {
            if ctx.message_service.delete(id)? {
                record(LogEvent::new(Event::MessageDeleted, "message delete"));
                output::success(&format!("Deleted message #{}", id));
            } else {
                output::warning(&format!("Message #{} not found", id));
            }
        }
    }

    Ok(())
}
