//! CLI command implementations

pub mod follow;
pub mod logs;
pub mod message;
pub mod reset;
pub mod status;
pub mod user;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use warbler_core::{LogEvent, LoggingService, User, WarblerContext};

/// Open the event log in the Warbler directory
pub fn open_log() -> Result<LoggingService> {
    let warbler_dir = get_warbler_dir()?;
    std::fs::create_dir_all(&warbler_dir)?;
    LoggingService::new(&warbler_dir, env!("CARGO_PKG_VERSION"))
}

/// Record an event; a log that can't be opened or written never fails the command
pub fn record(event: LogEvent) {
    if let Ok(log) = open_log() {
        let _ = log.record(event);
    }
}

/// Get the Warbler directory from environment or default
pub fn get_warbler_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WARBLER_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".warbler"))
        .ok_or_else(|| anyhow!("Could not find home directory; set WARBLER_DIR"))
}

/// Get or create the Warbler context
pub fn get_context() -> Result<WarblerContext> {
    let warbler_dir = get_warbler_dir()?;

    std::fs::create_dir_all(&warbler_dir)
        .with_context(|| format!("Failed to create warbler directory: {:?}", warbler_dir))?;

    WarblerContext::new(&warbler_dir).context("Failed to initialize warbler context")
}

/// Resolve a user given as a numeric id or a username
///
/// A number is tried as an id first, then as a username.
pub fn resolve_user(ctx: &WarblerContext, reference: &str) -> Result<User> {
    if let Ok(id) = reference.parse::<i64>() {
        if let Some(user) = ctx.directory.get(id)? {
            return Ok(user);
        }
    }
    ctx.directory
        .get_by_username(reference)?
        .ok_or_else(|| anyhow!("User '{}' not found", reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warbler_core::config::{Config, DatabaseLocation};
    use warbler_core::NewUser;

    fn context() -> WarblerContext {
        WarblerContext::from_config(Config::for_database(DatabaseLocation::InMemory)).unwrap()
    }

    #[test]
    fn test_resolve_by_id_and_username() {
        let ctx = context();
        let alice = ctx
            .directory
            .create(NewUser::new("alice@test.com", "alice", "HASHED_PASSWORD"))
            .unwrap();

        assert_eq!(resolve_user(&ctx, &alice.id.to_string()).unwrap(), alice);
        assert_eq!(resolve_user(&ctx, "alice").unwrap(), alice);
        assert!(resolve_user(&ctx, "bob").is_err());
    }

    #[test]
    fn test_numeric_username_without_matching_id() {
        let ctx = context();
        let numeric = ctx
            .directory
            .create(NewUser::new("n@test.com", "4242", "HASHED_PASSWORD"))
            .unwrap();

        assert_ne!(numeric.id, 4242);
        assert_eq!(resolve_user(&ctx, "4242").unwrap(), numeric);
    }
}
