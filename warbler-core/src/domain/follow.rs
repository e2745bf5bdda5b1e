//! Follows edge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directed edge: `user_following_id` follows `user_being_followed_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub user_being_followed_id: i64,
    pub user_following_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Edge from `follower` to `followed`, stamped now
    pub fn new(follower: i64, followed: i64) -> Self {
        Self {
            user_being_followed_id: followed,
            user_following_id: follower,
            created_at: Utc::now(),
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.user_being_followed_id == self.user_following_id
    }
}
