//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use duckdb::types::Type;
use duckdb::{params, Connection, Row};

use crate::config::DatabaseLocation;
use crate::domain::result::{Error, Result};
use crate::domain::{Follow, Message, NewMessage, NewUser, User};
use crate::ports::{DirectoryCounts, DirectoryStore};
use crate::schema;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// User columns, selected from `users u`
const USER_COLUMNS: &str =
    "u.id, u.email, u.username, u.password, u.image_url, u.header_image_url, u.bio, u.location";

/// Message columns; timestamp is read as text and parsed
const MESSAGE_COLUMNS: &str = "id, text, timestamp::VARCHAR, user_id";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("could not set lock on file")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbRepository {
    /// Open (or create) a database file
    ///
    /// Retries with exponential backoff when another process holds the file
    /// lock, e.g. two CLI invocations racing on the same directory.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[warbler] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Open whichever database the configuration points at
    pub fn open(location: &DatabaseLocation) -> Result<Self> {
        match location {
            DatabaseLocation::File(path) => Self::new(path),
            DatabaseLocation::InMemory => Self::in_memory(),
        }
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; the directory needs none
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Drop and recreate every directory table
    pub fn recreate_schema(&self) -> Result<()> {
        self.drop_schema()?;
        self.ensure_schema()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    fn user_exists(conn: &Connection, id: i64) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn insert_user_with(conn: &Connection, user: &NewUser) -> Result<User> {
        // The sequence hands out the id; it is never chosen by the caller
        let id: i64 = conn.query_row("SELECT nextval('users_id_seq')", [], |row| row.get(0))?;

        conn.execute(
            "INSERT INTO users (id, email, username, image_url, header_image_url, bio, location, password)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                user.email,
                user.username,
                user.image_url_or_default(),
                user.header_image_url_or_default(),
                user.bio,
                user.location,
                user.password,
            ],
        )?;

        Ok(user.clone().into_user(id))
    }

    fn query_users(conn: &Connection, sql: &str, user_id: Option<i64>) -> Result<Vec<User>> {
        let mut stmt = conn.prepare(sql)?;
        let users = match user_id {
            Some(id) => stmt
                .query_map(params![id], row_to_user)?
                .collect::<duckdb::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], row_to_user)?
                .collect::<duckdb::Result<Vec<_>>>()?,
        };
        Ok(users)
    }

    fn count(conn: &Connection, sql: &str, id: i64) -> Result<i64> {
        let count: i64 = conn.query_row(sql, params![id], |row| row.get(0))?;
        Ok(count)
    }
}

impl DirectoryStore for DuckDbRepository {
    fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(schema::CREATE_ALL)?;
        Ok(())
    }

    fn drop_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(schema::DROP_ALL)?;
        Ok(())
    }

    // === User operations ===

    fn insert_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn()?;
        Self::insert_user_with(&conn, user)
    }

    fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut inserted = Vec::with_capacity(users.len());
        for user in users {
            // Dropping `tx` on error rolls the whole batch back
            inserted.push(Self::insert_user_with(&tx, user)?);
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users u WHERE u.id = ?", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], row_to_user)?;
        Ok(rows.next().transpose()?)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users u WHERE u.username = ?", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![username], row_to_user)?;
        Ok(rows.next().transpose()?)
    }

    fn get_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM users u ORDER BY u.id", USER_COLUMNS);
        Self::query_users(&conn, &sql, None)
    }

    /// Deletes the user's follows, messages and record in one transaction
    fn delete_user(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM follows WHERE user_being_followed_id = ? OR user_following_id = ?",
            params![id, id],
        )?;
        tx.execute("DELETE FROM messages WHERE user_id = ?", params![id])?;
        let deleted = tx.execute("DELETE FROM users WHERE id = ?", params![id])?;

        tx.commit()?;
        Ok(deleted > 0)
    }

    // === Follow operations ===

    fn insert_follow(&self, follow: &Follow) -> Result<bool> {
        let conn = self.conn()?;

        for id in [follow.user_following_id, follow.user_being_followed_id] {
            if !Self::user_exists(&conn, id)? {
                return Err(Error::not_found(format!("user #{}", id)));
            }
        }

        let inserted = conn.execute(
            "INSERT INTO follows (user_being_followed_id, user_following_id, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT (user_being_followed_id, user_following_id) DO NOTHING",
            params![
                follow.user_being_followed_id,
                follow.user_following_id,
                format_timestamp(&follow.created_at),
            ],
        )?;

        Ok(inserted > 0)
    }

    fn delete_follow(&self, follower: i64, followed: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM follows WHERE user_following_id = ? AND user_being_followed_id = ?",
            params![follower, followed],
        )?;
        Ok(deleted > 0)
    }

    fn follow_exists(&self, follower: i64, followed: i64) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE user_following_id = ? AND user_being_followed_id = ?",
            params![follower, followed],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn get_followers(&self, user_id: i64) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM users u
             JOIN follows f ON f.user_following_id = u.id
             WHERE f.user_being_followed_id = ?
             ORDER BY u.id",
            USER_COLUMNS
        );
        Self::query_users(&conn, &sql, Some(user_id))
    }

    fn get_following(&self, user_id: i64) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM users u
             JOIN follows f ON f.user_being_followed_id = u.id
             WHERE f.user_following_id = ?
             ORDER BY u.id",
            USER_COLUMNS
        );
        Self::query_users(&conn, &sql, Some(user_id))
    }

    fn follower_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Self::count(
            &conn,
            "SELECT COUNT(*) FROM follows WHERE user_being_followed_id = ?",
            user_id,
        )
    }

    fn following_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Self::count(
            &conn,
            "SELECT COUNT(*) FROM follows WHERE user_following_id = ?",
            user_id,
        )
    }

    // === Message operations ===

    fn insert_message(&self, message: &NewMessage) -> Result<Message> {
        let conn = self.conn()?;

        if !Self::user_exists(&conn, message.user_id)? {
            return Err(Error::not_found(format!("user #{}", message.user_id)));
        }

        let id: i64 =
            conn.query_row("SELECT nextval('messages_id_seq')", [], |row| row.get(0))?;
        conn.execute(
            "INSERT INTO messages (id, text, timestamp, user_id) VALUES (?, ?, ?, ?)",
            params![
                id,
                message.text,
                format_timestamp(&message.timestamp),
                message.user_id,
            ],
        )?;

        Ok(message.clone().into_message(id))
    }

    fn get_messages_by_user(&self, user_id: i64) -> Result<Vec<Message>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM messages WHERE user_id = ? ORDER BY timestamp DESC, id DESC",
            MESSAGE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let messages = stmt
            .query_map(params![user_id], row_to_message)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(messages)
    }

    fn message_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Self::count(
            &conn,
            "SELECT COUNT(*) FROM messages WHERE user_id = ?",
            user_id,
        )
    }

    fn delete_message(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM messages WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    // === Maintenance ===

    fn clear_all(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for table in schema::TABLES {
            tx.execute(&format!("DELETE FROM {}", table), [])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn counts(&self) -> Result<DirectoryCounts> {
        let conn = self.conn()?;
        let counts = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM messages),
                (SELECT COUNT(*) FROM follows)",
            [],
            |row| {
                Ok(DirectoryCounts {
                    users: row.get(0)?,
                    messages: row.get(1)?,
                    follows: row.get(2)?,
                })
            },
        )?;
        Ok(counts)
    }
}

// Helper functions

fn row_to_user(row: &Row) -> duckdb::Result<User> {
    // Column order follows USER_COLUMNS
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        header_image_url: row.get(5)?,
        bio: row.get(6)?,
        location: row.get(7)?,
    })
}

fn row_to_message(row: &Row) -> duckdb::Result<Message> {
    let raw: String = row.get(2)?;
    let timestamp = parse_timestamp(&raw)
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(Message {
        id: row.get(0)?,
        text: row.get(1)?,
        timestamp,
        user_id: row.get(3)?,
    })
}

/// Format a UTC instant for a TIMESTAMP column (microsecond precision)
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Parse a TIMESTAMP column read back as VARCHAR
fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
