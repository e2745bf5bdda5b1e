//! Follow commands - manage and inspect follow relationships

use anyhow::Result;
use warbler_core::{Event, LogEvent};

use super::{get_context, record, resolve_user};
use crate::output;

pub fn follow(follower: &str, followed: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let follower = resolve_user(&ctx, follower)?;
    let followed = resolve_user(&ctx, followed)?;

    let created = ctx.directory.follow(&follower, &followed)?;
    if created {
        record(LogEvent::new(Event::FollowCreated, "follow"));
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "follower_id": follower.id,
                "followed_id": followed.id,
                "created": created
            })
        );
    } else if created {
        output::success(&format!("{} now follows {}", follower.username, followed.username));
    } else {
        output::info(&format!("{} already follows {}", follower.username, followed.username));
    }

    Ok(())
}

pub fn unfollow(follower: &str, followed: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let follower = resolve_user(&ctx, follower)?;
    let followed = resolve_user(&ctx, followed)?;

    let removed = ctx.directory.unfollow(&follower, &followed)?;
    if removed {
        record(LogEvent::new(Event::FollowRemoved, "unfollow"));
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "follower_id": follower.id,
                "followed_id": followed.id,
                "removed": removed
            })
        );
    } else if removed {
        output::success(&format!("{} no longer follows {}", follower.username, followed.username));
    } else {
        output::warning(&format!("{} was not following {}", follower.username, followed.username));
    }

    Ok(())
}

pub fn followers(user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let users = ctx.directory.followers(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else if users.is_empty() {
        output::info(&format!("Nobody follows {}", user.username));
    } else {
        println!("{}", output::user_table(&users));
    }

    Ok(())
}

pub fn following(user: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = resolve_user(&ctx, user)?;
    let users = ctx.directory.following(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else if users.is_empty() {
        output::info(&format!("{} follows nobody", user.username));
    } else {
        println!("{}", output::user_table(&users));
    }

    Ok(())
}
