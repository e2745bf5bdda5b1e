//! User command - create, show, list and delete users

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};
use warbler_core::{Event, LogEvent, NewUser, User, WarblerContext};

use super::{get_context, record, resolve_user};
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
        /// Username (prompted if omitted)
        #[arg(long)]
        username: Option<String>,
        /// Password hash to store (prompted if omitted)
        #[arg(long, env = "WARBLER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Profile image URL
        #[arg(long)]
        image_url: Option<String>,
        /// Header image URL
        #[arg(long)]
        header_image_url: Option<String>,
        /// Short biography
        #[arg(long)]
        bio: Option<String>,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single user
    Show {
        /// User (id or username)
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a user with their follows and messages
    Delete {
        /// User (id or username)
        user: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: UserCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        UserCommands::Create {
            email,
            username,
            password,
            image_url,
            header_image_url,
            bio,
            location,
            json,
        } => {
            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let username = match username {
                Some(u) => u,
                None => Input::new().with_prompt("Username").interact_text()?,
            };
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };

            let mut new_user = NewUser::new(email, username, password);
            if let Some(url) = image_url {
                new_user = new_user.with_image_url(url);
            }
            if let Some(url) = header_image_url {
                new_user = new_user.with_header_image_url(url);
            }
            if let Some(bio) = bio {
                new_user = new_user.with_bio(bio);
            }
            if let Some(location) = location {
                new_user = new_user.with_location(location);
            }

            let user = ctx.directory.create(new_user)?;
            record(LogEvent::new(Event::UserCreated, "user create"));

            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                output::success(&format!("Created {}", ctx.directory.represent(&user)));
            }
        }
        UserCommands::Show { user, json } => {
            let user = resolve_user(&ctx, &user)?;
            show(&ctx, &user, json)?;
        }
        UserCommands::List { json } => {
            let users = ctx.directory.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                output::info("No users yet");
            } else {
                println!("{}", output::user_table(&users));
            }
        }
        UserCommands::Delete { user, force } => {
            let user = resolve_user(&ctx, &user)?;

            if !force {
                println!(
                    "\n{}",
                    format!("This will delete {} with their follows and messages.", user).yellow()
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

            ctx.directory.delete(user.id)?;
            record(LogEvent::new(Event::UserDeleted, "user delete"));
            output::success(&format!("Deleted {}", user));
        }
    }

    Ok(())
}

fn show(ctx: &WarblerContext, user: &User, json: bool) -> Result<()> {
    let followers = ctx.directory.follower_count(user)?;
    let following = ctx.directory.following_count(user)?;
    let messages = ctx.message_service.message_count(user.id)?;

    if json {
        let mut value = serde_json::to_value(user)?;
        value["followers"] = serde_json::json!(followers);
        value["following"] = serde_json::json!(following);
        value["messages"] = serde_json::json!(messages);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", ctx.directory.represent(user).bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Email".to_string(), user.email.clone()]);
    table.add_row(vec!["Image".to_string(), user.image_url.clone()]);
    table.add_row(vec!["Header".to_string(), user.header_image_url.clone()]);
    table.add_row(vec!["Bio".to_string(), user.bio.clone().unwrap_or_default()]);
    table.add_row(vec!["Location".to_string(), user.location.clone().unwrap_or_default()]);
    table.add_row(vec!["Followers".to_string(), followers.to_string()]);
    table.add_row(vec!["Following".to_string(), following.to_string()]);
    table.add_row(vec!["Messages".to_string(), messages.to_string()]);
    println!("{}", table);

    Ok(())
}
