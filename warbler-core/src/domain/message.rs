//! Message domain model

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Longest message text accepted, in characters
pub const MAX_MESSAGE_LENGTH: usize = 140;

/// A persisted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
}

/// A message that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
}

impl NewMessage {
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            // Stored with microsecond precision
            timestamp: Utc::now().trunc_subsecs(6),
            user_id,
        }
    }

    /// Validate message text
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("message text cannot be empty");
        }
        if self.text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err("message text cannot exceed 140 characters");
        }
        Ok(())
    }

    pub fn into_message(self, id: i64) -> Message {
        Message {
            id,
            text: self.text,
            timestamp: self.timestamp,
            user_id: self.user_id,
        }
    }
}
