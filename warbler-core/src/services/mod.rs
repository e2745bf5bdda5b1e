//! Service layer - directory logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific feature area.

mod directory;
pub mod logging;
mod message;
mod status;

pub use directory::UserDirectory;
pub use logging::{Event, LogEntry, LogEvent, LogStats, LoggingService};
pub use message::MessageService;
pub use status::{StatusService, StatusSummary};
