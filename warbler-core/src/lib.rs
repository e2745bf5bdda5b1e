//! Warbler Core - user directory and social graph
//!
//! This crate implements the directory logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Follow, Message)
//! - **ports**: Trait definitions for external dependencies (DirectoryStore)
//! - **services**: Directory logic orchestration
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod schema;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::DirectoryStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Follow, Message, NewMessage, NewUser, User};
pub use services::{Event, LogEvent, LoggingService};

/// Main context for Warbler operations
///
/// This is the primary entry point for all directory logic. It holds
/// the database connection, configuration, and all services.
pub struct WarblerContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub directory: UserDirectory,
    pub message_service: MessageService,
    pub status_service: StatusService,
}

impl WarblerContext {
    /// Create a new Warbler context from the settings in `warbler_dir`
    pub fn new(warbler_dir: &Path) -> Result<Self> {
        let config = Config::load(warbler_dir)?;
        Self::from_config(config)
    }

    /// Create a context for an already resolved configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let repository = Arc::new(DuckDbRepository::open(&config.database)?);

        if config.testing {
            repository.recreate_schema()?;
        } else {
            repository.ensure_schema()?;
        }

        let store: Arc<dyn DirectoryStore> = repository.clone();
        let directory = UserDirectory::new(Arc::clone(&store));
        let message_service = MessageService::new(Arc::clone(&store));
        let status_service = StatusService::new(store);

        Ok(Self {
            config,
            repository,
            directory,
            message_service,
            status_service,
        })
    }
}
