//! Core domain entities
//!
//! All directory entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod follow;
mod message;
pub mod result;
mod user;

pub use follow::Follow;
pub use message::{Message, NewMessage, MAX_MESSAGE_LENGTH};
pub use user::{NewUser, User, DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
