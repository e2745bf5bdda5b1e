//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the DirectoryStore port (file-backed or in-memory)

pub mod duckdb;
