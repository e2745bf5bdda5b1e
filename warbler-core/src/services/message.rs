//! Message service - posting and listing messages

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Message, NewMessage};
use crate::ports::DirectoryStore;

/// Message service for user posts
pub struct MessageService {
    store: Arc<dyn DirectoryStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Post a message as `user_id`
    pub fn post(&self, user_id: i64, text: &str) -> Result<Message> {
        let message = NewMessage::new(user_id, text);
        message.validate().map_err(Error::validation)?;
        self.store.insert_message(&message)
    }

    /// Messages by `user_id`, newest first
    pub fn messages_for(&self, user_id: i64) -> Result<Vec<Message>> {
        self.store.get_messages_by_user(user_id)
    }

    pub fn message_count(&self, user_id: i64) -> Result<i64> {
        self.store.message_count(user_id)
    }

    pub fn delete(&self, message_id: i64) -> Result<bool> {
        self.store.delete_message(message_id)
    }
}
