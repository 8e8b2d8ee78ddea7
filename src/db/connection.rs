// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::db::config::DatabaseConfig;
use crate::db::migrations::{initialize_database, SCHEMA_SQL};
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Resolve the database file path
///
/// Without an explicit path the database lives in the application data
/// directory: {APP_DATA}/repertoire/repertoire.db
pub fn get_database_path(config: &DatabaseConfig) -> AppResult<PathBuf> {
    if let Some(path) = &config.path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Other(format!("Could not create {:?}: {}", parent, e)))?;
        }
        return Ok(path.clone());
    }

    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    let repertoire_dir = app_data_dir.join("repertoire");
    std::fs::create_dir_all(&repertoire_dir).map_err(|e| {
        AppError::Other(format!("Could not create {:?}: {}", repertoire_dir, e))
    })?;

    Ok(repertoire_dir.join("repertoire.db"))
}

/// Create a connection pool and bring the schema up to date
///
/// Every pooled connection gets foreign keys, the configured journal mode
/// and busy timeout.
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    let db_path = get_database_path(config)?;
    let pragmas = config.connection_pragmas();

    let manager =
        SqliteConnectionManager::file(&db_path).with_init(move |conn| conn.execute_batch(&pragmas));

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    log::info!(
        "Opened database {:?} (max {} connections)",
        db_path,
        config.max_connections
    );
    Ok(pool)
}

/// Single-connection in-memory pool with the schema applied
///
/// Each in-memory connection is its own database, so the pool is capped at
/// one connection. Callers must not hold a connection while asking for another.
pub fn create_memory_pool() -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)
    });

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create memory pool: {}", e)))?;

    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone connection (for testing)
///
/// In-memory database with foreign keys and the schema applied.
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    initialize_database(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::with_path(dir.path().join("nested").join("test.db"));

        let path = get_database_path(&config).unwrap();

        assert!(path.ends_with("nested/test.db"));
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn test_connection_pool_creation() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::with_path(dir.path().join("pool.db"));

        let pool = create_connection_pool(&config).unwrap();
        let conn = get_connection(&pool).unwrap();

        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_memory_pool_has_schema() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        let songs: i64 = conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(songs, 0);
    }

    #[test]
    fn test_test_connection() {
        let conn = create_test_connection().unwrap();

        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);

        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }
}
