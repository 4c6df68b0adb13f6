//! Storage layer
//!
//! SQLite or MySQL through sqlx for the relational backend, MongoDB for the document
//! backend, and DashMap for an in-process store with no external dependencies.

pub mod document;
pub mod memory;
pub mod sql;

pub use document::DocumentItemStore;
pub use memory::MemoryItemStore;
pub use sql::{MySqlItemStore, SqlDialect, SqliteItemStore};

use crate::config::StoreConfig;
use clap::ValueEnum;
use std::sync::Arc;
use todo_core::{ItemStore, Result};

/// Which [`ItemStore`] implementation to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    #[value(alias = "sqlite3")]
    Sqlite,
    Mysql,
    #[value(alias = "mongodb")]
    Mongo,
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Mysql => write!(f, "mysql"),
            Backend::Mongo => write!(f, "mongo"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// Open the selected backend. Fails if its parameters are missing or the
/// store cannot be reached.
pub async fn connect(backend: Backend, config: &StoreConfig) -> Result<Arc<dyn ItemStore>> {
    let store: Arc<dyn ItemStore> = match backend {
        Backend::Sqlite => sql::connect(SqlDialect::Sqlite, config).await?,
        Backend::Mysql => sql::connect(SqlDialect::MySql, config).await?,
        Backend::Mongo => Arc::new(DocumentItemStore::connect(config).await?),
        Backend::Memory => Arc::new(MemoryItemStore::new()),
    };
    Ok(store)
}
