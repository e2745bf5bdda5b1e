//! User directory - users and the follows graph

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Follow, NewUser, User};
use crate::ports::DirectoryStore;

/// Directory of users and the directed follows relationship between them
pub struct UserDirectory {
    store: Arc<dyn DirectoryStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    // === Users ===

    /// Persist a new user; the store assigns its id
    ///
    /// A duplicate email or username fails with `Error::ConstraintViolation`.
    pub fn create(&self, user: NewUser) -> Result<User> {
        self.store.insert_user(&user)
    }

    /// Persist several users at once; either all are stored or none are
    pub fn create_many(&self, users: &[NewUser]) -> Result<Vec<User>> {
        self.store.insert_users(users)
    }

    /// Look up a user; `None` if no such id
    pub fn get(&self, id: i64) -> Result<Option<User>> {
        self.store.get_user(id)
    }

    pub fn get_or_error(&self, id: i64) -> Result<User> {
        self.get(id)?
            .ok_or_else(|| Error::not_found(format!("user #{}", id)))
    }

    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        self.store.get_user_by_username(username)
    }

    /// All users, ordered by id
    pub fn list(&self) -> Result<Vec<User>> {
        self.store.get_users()
    }

    /// Remove a user along with their messages and follows edges
    ///
    /// Returns false if the user did not exist.
    pub fn delete(&self, id: i64) -> Result<bool> {
        self.store.delete_user(id)
    }

    /// Canonical textual form of a user
    pub fn represent(&self, user: &User) -> String {
        user.represent()
    }

    // === Follows ===

    /// Make `follower` follow `followed`
    ///
    /// Returns true if a new edge was stored and false if it already
    /// existed. Following yourself is rejected.
    pub fn follow(&self, follower: &User, followed: &User) -> Result<bool> {
        self.follow_ids(follower.id, followed.id)
    }

    pub fn follow_ids(&self, follower: i64, followed: i64) -> Result<bool> {
        let follow = Follow::new(follower, followed);
        if follow.is_self_follow() {
            return Err(Error::validation("a user cannot follow themselves"));
        }
        self.store.insert_follow(&follow)
    }

    /// Remove the edge `follower` -> `followed`; true if one was removed
    pub fn unfollow(&self, follower: &User, followed: &User) -> Result<bool> {
        self.unfollow_ids(follower.id, followed.id)
    }

    pub fn unfollow_ids(&self, follower: i64, followed: i64) -> Result<bool> {
        self.store.delete_follow(follower, followed)
    }

    /// True iff `user` follows `other`
    pub fn is_following(&self, user: &User, other: &User) -> Result<bool> {
        self.store.follow_exists(user.id, other.id)
    }

    /// True iff `other` follows `user`
    pub fn is_followed_by(&self, user: &User, other: &User) -> Result<bool> {
        self.store.follow_exists(other.id, user.id)
    }

    /// Users following `user`
    pub fn followers(&self, user: &User) -> Result<Vec<User>> {
        self.store.get_followers(user.id)
    }

    /// Users `user` follows
    pub fn following(&self, user: &User) -> Result<Vec<User>> {
        self.store.get_following(user.id)
    }

    pub fn follower_count(&self, user: &User) -> Result<i64> {
        self.store.follower_count(user.id)
    }

    pub fn following_count(&self, user: &User) -> Result<i64> {
        self.store.following_count(user.id)
    }

    // === Maintenance ===

    /// Delete every user, message and follows record
    pub fn reset(&self) -> Result<()> {
        self.store.clear_all()
    }
}
