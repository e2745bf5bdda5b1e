//! Event log for directory changes made through the CLI
//!
//! Entries live in `logs.duckdb` next to the directory database, so a reset
//! of the directory never touches them. An entry names what happened and
//! which command did it. Emails, usernames, passwords and message text are
//! never recorded; only failures carry a message.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use duckdb::types::Type;
use duckdb::{params, Connection, Row};
use serde::Serialize;

use crate::schema;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Something that happened to the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    UserCreated,
    UserDeleted,
    FollowCreated,
    FollowRemoved,
    MessagePosted,
    MessageDeleted,
    DirectoryReset,
    CommandFailed,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserCreated => "user_created",
            Event::UserDeleted => "user_deleted",
            Event::FollowCreated => "follow_created",
            Event::FollowRemoved => "follow_removed",
            Event::MessagePosted => "message_posted",
            Event::MessageDeleted => "message_deleted",
            Event::DirectoryReset => "directory_reset",
            Event::CommandFailed => "command_failed",
        }
    }
}

/// An event about to be recorded
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub event: Event,
    pub command: String,
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(event: Event, command: impl Into<String>) -> Self {
        Self {
            event,
            command: command.into(),
            error: None,
        }
    }

    /// A command that ended with an error
    pub fn failed(command: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            event: Event::CommandFailed,
            command: command.into(),
            error: Some(error.into()),
        }
    }
}

/// A recorded entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    pub app_version: String,
    pub event: String,
    pub command: String,
    pub error: Option<String>,
}

/// Totals over the whole log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogStats {
    pub total: u64,
    pub errors: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn millis_to_datetime(idx: usize, ms: i64) -> duckdb::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
        duckdb::Error::FromSqlConversionFailure(idx, Type::BigInt, "timestamp out of range".into())
    })
}

fn row_to_entry(row: &Row) -> duckdb::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        recorded_at: millis_to_datetime(1, row.get(1)?)?,
        app_version: row.get(2)?,
        event: row.get(3)?,
        command: row.get(4)?,
        error: row.get(5)?,
    })
}

/// Writes and reads the event log
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
}

impl LoggingService {
    /// Open (or create) `logs.duckdb` inside `warbler_dir`
    pub fn new(warbler_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = warbler_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(schema::LOGS)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    pub fn record(&self, event: LogEvent) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO event_log (recorded_at, app_version, event, command, error)
             VALUES (?, ?, ?, ?, ?)",
            params![
                now_ms(),
                self.app_version,
                event.event.name(),
                event.command,
                event.error,
            ],
        )?;
        Ok(())
    }

    /// Newest entries first, optionally only failures
    pub fn recent(&self, limit: usize, errors_only: bool) -> Result<Vec<LogEntry>> {
        let filter = if errors_only { "WHERE error IS NOT NULL" } else { "" };
        let sql = format!(
            "SELECT id, recorded_at, app_version, event, command, error
             FROM event_log {} ORDER BY recorded_at DESC, id DESC LIMIT ?",
            filter
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![limit as i64], row_to_entry)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn stats(&self) -> Result<LogStats> {
        let conn = self.conn()?;
        let (total, errors, oldest, newest): (i64, i64, Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT COUNT(*), COUNT(error), MIN(recorded_at), MAX(recorded_at) FROM event_log",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        Ok(LogStats {
            total: total as u64,
            errors: errors as u64,
            oldest: oldest.map(|ms| millis_to_datetime(2, ms)).transpose()?,
            newest: newest.map(|ms| millis_to_datetime(3, ms)).transpose()?,
        })
    }

    /// Delete entries older than `days` days, returning how many went
    pub fn prune_older_than(&self, days: u64) -> Result<u64> {
        let span = i64::try_from(days)
            .unwrap_or(i64::MAX)
            .saturating_mul(MS_PER_DAY);
        self.prune_before(now_ms().saturating_sub(span))
    }

    /// Delete entries recorded before `cutoff_ms` (unix milliseconds)
    pub fn prune_before(&self, cutoff_ms: i64) -> Result<u64> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM event_log WHERE recorded_at < ?", params![cutoff_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &Path) -> LoggingService {
        LoggingService::new(dir, "0.1.0").unwrap()
    }

    #[test]
    fn test_record_and_read_back() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        log.record(LogEvent::new(Event::UserCreated, "user create")).unwrap();
        log.record(LogEvent::new(Event::FollowCreated, "follow")).unwrap();

        let entries = log.recent(10, false).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, "follow_created");
        assert_eq!(entries[0].command, "follow");
        assert_eq!(entries[1].event, "user_created");
        assert_eq!(entries[1].app_version, "0.1.0");
        assert!(entries[1].error.is_none());
        assert!(log.db_path().exists());
    }

    #[test]
    fn test_errors_only() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        log.record(LogEvent::new(Event::MessagePosted, "message post")).unwrap();
        log.record(LogEvent::failed("follow", "Validation error: cannot follow yourself"))
            .unwrap();

        let errors = log.recent(10, true).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "command_failed");
        assert_eq!(
            errors[0].error.as_deref(),
            Some("Validation error: cannot follow yourself")
        );
    }

    #[test]
    fn test_stats_count_every_entry() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        assert_eq!(log.stats().unwrap(), LogStats::default());

        log.conn()
            .unwrap()
            .execute_batch(
                "INSERT INTO event_log (recorded_at, app_version, event, command, error)
                 SELECT 1000 + range, '0.1.0', 'command_failed', 'reset', 'Database error: locked'
                 FROM range(1200)",
            )
            .unwrap();
        log.record(LogEvent::new(Event::DirectoryReset, "reset")).unwrap();

        let stats = log.stats().unwrap();
        assert_eq!(stats.total, 1201);
        assert_eq!(stats.errors, 1200);
        assert_eq!(stats.oldest, Utc.timestamp_millis_opt(1000).single());
        assert!(stats.newest > stats.oldest);
    }

    #[test]
    fn test_prune() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());

        log.record(LogEvent::new(Event::UserDeleted, "user delete")).unwrap();
        log.record(LogEvent::new(Event::MessageDeleted, "message delete")).unwrap();

        // Nothing is that old, and huge spans don't overflow
        assert_eq!(log.prune_older_than(u64::MAX).unwrap(), 0);
        assert_eq!(log.prune_older_than(30).unwrap(), 0);

        assert_eq!(log.prune_before(now_ms() + 1000).unwrap(), 2);
        assert_eq!(log.stats().unwrap().total, 0);
    }
}
