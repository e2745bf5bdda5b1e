//! Directory store port - database abstraction

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Follow, Message, NewMessage, NewUser, User};

/// Storage abstraction for users, follows and messages
///
/// Implementations assign identifiers on insert; callers never supply them.
pub trait DirectoryStore: Send + Sync {
    // === Schema ===

    /// Create any missing tables
    fn ensure_schema(&self) -> Result<()>;

    /// Drop every directory table and sequence
    fn drop_schema(&self) -> Result<()>;

    // === Users ===

    /// Persist a user and return it with its assigned id
    fn insert_user(&self, user: &NewUser) -> Result<User>;

    /// Persist several users in one transaction
    fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>>;

    fn get_user(&self, id: i64) -> Result<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All users ordered by id
    fn get_users(&self) -> Result<Vec<User>>;

    /// Delete a user with their messages and every follows edge touching them
    ///
    /// Returns false if no such user existed.
    fn delete_user(&self, id: i64) -> Result<bool>;

    // === Follows ===

    /// Store an edge; returns false if it already existed
    fn insert_follow(&self, follow: &Follow) -> Result<bool>;

    /// Remove the edge follower -> followed; returns false if absent
    fn delete_follow(&self, follower: i64, followed: i64) -> Result<bool>;

    fn follow_exists(&self, follower: i64, followed: i64) -> Result<bool>;

    /// Users following `user_id`, ordered by id
    fn get_followers(&self, user_id: i64) -> Result<Vec<User>>;

    /// Users that `user_id` follows, ordered by id
    fn get_following(&self, user_id: i64) -> Result<Vec<User>>;

    fn follower_count(&self, user_id: i64) -> Result<i64>;

    fn following_count(&self, user_id: i64) -> Result<i64>;

    // === Messages ===

    fn insert_message(&self, message: &NewMessage) -> Result<Message>;

    /// Messages owned by `user_id`, newest first
    fn get_messages_by_user(&self, user_id: i64) -> Result<Vec<Message>>;

    fn message_count(&self, user_id: i64) -> Result<i64>;

    /// Returns false if no such message existed
    fn delete_message(&self, id: i64) -> Result<bool>;

    // === Maintenance ===

    /// Delete every follows, message and user record
    fn clear_all(&self) -> Result<()>;

    /// Row counts across the directory
    fn counts(&self) -> Result<DirectoryCounts>;
}

/// Row counts across the directory tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryCounts {
    pub users: i64,
    pub messages: i64,
    pub follows: i64,
}
