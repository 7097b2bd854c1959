//! SQLite persistence for projected entities.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - The `Repository`, which implements `EntityStore` and the read-side queries

pub mod migrations;
pub mod repo;

pub use migrations::{init_db, init_memory_db};
pub use repo::Repository;
