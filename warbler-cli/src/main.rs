//! Warbler CLI - manage the user directory from your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{follow, logs, message, reset, status, user};
use warbler_core::LogEvent;

/// Warbler - users, follows and messages in your terminal
#[derive(Parser)]
#[command(name = "warbler", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Make one user follow another
    Follow {
        /// Follower (id or username)
        follower: String,
        /// User to follow (id or username)
        followed: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop following a user
    Unfollow {
        /// Follower (id or username)
        follower: String,
        /// User to stop following (id or username)
        followed: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the users following a user
    Followers {
        /// User (id or username)
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the users a user follows
    Following {
        /// User (id or username)
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Post and list messages
    Message {
        #[command(subcommand)]
        command: message::MessageCommands,
    },

    /// Show directory status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every user, follow and message
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::User { .. } => "user",
            Commands::Follow { .. } => "follow",
            Commands::Unfollow { .. } => "unfollow",
            Commands::Followers { .. } => "followers",
            Commands::Following { .. } => "following",
            Commands::Message { .. } => "message",
            Commands::Status { .. } => "status",
            Commands::Reset { .. } => "reset",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::record(LogEvent::failed(name, e.to_string()));
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::User { command } => user::run(command),
        Commands::Follow { follower, followed, json } => follow::follow(&follower, &followed, json),
        Commands::Unfollow { follower, followed, json } => {
            follow::unfollow(&follower, &followed, json)
        }
        Commands::Followers { user, json } => follow::followers(&user, json),
        Commands::Following { user, json } => follow::following(&user, json),
        Commands::Message { command } => message::run(command),
        Commands::Status { json } => status::run(json),
        Commands::Reset { force } => reset::run(force),
        Commands::Logs { command } => logs::run(command),
    }
}
