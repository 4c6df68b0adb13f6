//! Command line and environment configuration

use crate::storage::Backend;
use clap::{Args, Parser};
use std::net::SocketAddr;

pub const DEFAULT_MONGODB_DATABASE: &str = "todo";
pub const DEFAULT_MONGODB_COLLECTION: &str = "todo_items";

/// Older deployments name the SQL settings after the ORM they ran on
pub const LEGACY_SQL_DIALECT_ENV: &str = "GORM_DIALECT";
pub const LEGACY_SQL_CONNECTION_STRING_ENV: &str = "GORM_CONNECTION_STRING";

#[derive(Debug, Parser)]
#[command(name = "todo-server")]
#[command(author, version, about = "REST backend for a to-do list", long_about = None)]
pub struct ServerArgs {
    /// Storage backend to use
    #[arg(long, env = "TODO_DB", value_enum)]
    pub db: Backend,

    /// Address to listen on
    #[arg(long, env = "HOST_ADDRESS", default_value = "127.0.0.1:8080")]
    pub address: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub store: StoreConfig,
}

/// Connection parameters for the storage backends.
///
/// Only the fields belonging to the selected backend are read; a missing
/// required field makes that backend's `connect` fail.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// SQL dialect for the relational backend (sqlite, sqlite3, mysql).
    /// Defaults to the one named by --db.
    #[arg(long, env = "SQL_DIALECT")]
    pub sql_dialect: Option<String>,

    /// SQLite path, sqlite: URL or :memory:; mysql:// URL for MySQL
    #[arg(long, env = "SQL_CONNECTION_STRING")]
    pub sql_connection_string: Option<String>,

    #[arg(long, env = "MONGODB_CONNECTION_STRING")]
    pub mongodb_connection_string: Option<String>,

    #[arg(long, env = "MONGODB_DATABASE", default_value = DEFAULT_MONGODB_DATABASE)]
    pub mongodb_database: String,

    #[arg(long, env = "MONGODB_COLLECTION", default_value = DEFAULT_MONGODB_COLLECTION)]
    pub mongodb_collection: String,
}

impl StoreConfig {
    pub fn sqlite(connection_string: impl Into<String>) -> Self {
        Self {
            sql_dialect: Some("sqlite".to_string()),
            sql_connection_string: Some(connection_string.into()),
            ..Self::default()
        }
    }

    /// Fill SQL settings left unset from their `GORM_*` names.
    ///
    /// `lookup` is `std::env::var` in the binary.
    pub fn with_env_aliases<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.sql_dialect.is_none() {
            self.sql_dialect = lookup(LEGACY_SQL_DIALECT_ENV);
        }
        if self.sql_connection_string.is_none() {
            self.sql_connection_string = lookup(LEGACY_SQL_CONNECTION_STRING_ENV);
        }
        self
    }

    pub fn mongodb(connection_string: impl Into<String>) -> Self {
        Self {
            mongodb_connection_string: Some(connection_string.into()),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sql_dialect: None,
            sql_connection_string: None,
            mongodb_connection_string: None,
            mongodb_database: DEFAULT_MONGODB_DATABASE.to_string(),
            mongodb_collection: DEFAULT_MONGODB_COLLECTION.to_string(),
        }
    }
}
