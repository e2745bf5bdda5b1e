//! Database schema - embedded SQL files
//!
//! The SQL is compiled into the binary at build time using include_str!.
//! There is no versioning: `CREATE_ALL` is idempotent and `DROP_ALL`
//! removes every directory table so a test run can start from scratch.

/// Creates the users, follows and messages tables with their id sequences
pub const CREATE_ALL: &str = include_str!("create_all.sql");

/// Drops every directory table and sequence
pub const DROP_ALL: &str = include_str!("drop_all.sql");

/// Creates the event_log table in the log database
pub const LOGS: &str = include_str!("logs.sql");

/// Directory tables cleared by a reset
pub const TABLES: &[&str] = &["follows", "messages", "users"];
