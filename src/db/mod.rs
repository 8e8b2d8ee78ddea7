// src/db/mod.rs
//
// Database module
//
// Provides:
// - Configuration
// - Connection pooling
// - Schema migrations
// - The unit of work used by every mutating service

pub mod config;
pub mod connection;
pub mod migrations;
pub mod unit_of_work;

pub use config::DatabaseConfig;

pub use connection::{
    create_connection_pool, create_memory_pool, get_connection, get_database_path,
    ConnectionPool, PooledConn,
};

pub use migrations::{initialize_database, verify_database_integrity, CURRENT_SCHEMA_VERSION};

pub use unit_of_work::{SqliteUnitOfWork, UnitOfWork};
