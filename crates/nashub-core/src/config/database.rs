//! SQLite database configuration.

use serde::{Deserialize, Serialize};

/// SQLite connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:` for an in-memory
    /// database.
    #[serde(default = "default_path")]
    pub path: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Enable write-ahead logging.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
    /// Enforce foreign key constraints.
    #[serde(default = "default_true")]
    pub enable_foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for an in-memory database, used by tests.
    ///
    /// A single connection keeps every statement on the same in-memory
    /// database instance.
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            // WAL is meaningless for in-memory databases
            enable_wal: false,
            ..Self::default()
        }
    }
}

fn default_path() -> String {
    "data/nashub.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
