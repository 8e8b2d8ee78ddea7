// src/db/config.rs
//
// Database configuration
//
// Hosts embed this struct in their own configuration; every field has a
// default so an empty section is valid.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file. `None` means `{data_dir}/repertoire/repertoire.db`
    pub path: Option<PathBuf>,

    /// Upper bound of pooled connections
    pub max_connections: u32,

    /// SQLite busy timeout
    pub busy_timeout_ms: u32,

    /// Write-ahead logging
    pub wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 15,
            busy_timeout_ms: 5000,
            wal: true,
        }
    }
}

impl DatabaseConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Pragmas applied to every new connection
    pub(crate) fn connection_pragmas(&self) -> String {
        let journal_mode = if self.wal { "WAL" } else { "DELETE" };
        format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = {};
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            journal_mode, self.busy_timeout_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 15);
        assert!(config.path.is_none());
        assert!(config.connection_pragmas().contains("journal_mode = WAL"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{ "path": "/tmp/r.db", "wal": false }"#).unwrap();

        assert_eq!(config.path, Some(PathBuf::from("/tmp/r.db")));
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(config.connection_pragmas().contains("journal_mode = DELETE"));
    }
}
