//! Status service - directory summary

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::DirectoryStore;

/// Status service for directory summaries
pub struct StatusService {
    store: Arc<dyn DirectoryStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> Result<StatusSummary> {
        let counts = self.store.counts()?;

        Ok(StatusSummary {
            total_users: counts.users,
            total_messages: counts.messages,
            total_follows: counts.follows,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: i64,
    pub total_messages: i64,
    pub total_follows: i64,
}
