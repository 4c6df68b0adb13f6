//! Relational item stores on sqlx
//!
//! SQLite runs embedded; MySQL needs a server. Both keep items in an
//! `items` table with an auto-incremented integer key.

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlItemStore;
pub use sqlite::SqliteItemStore;

use crate::config::StoreConfig;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use todo_core::{ItemStore, Result, StoreError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    MySql,
}

impl FromStr for SqlDialect {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            "mysql" => Ok(SqlDialect::MySql),
            other => Err(StoreError::Config(format!(
                "Unsupported SQL dialect: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::Sqlite => write!(f, "sqlite"),
            SqlDialect::MySql => write!(f, "mysql"),
        }
    }
}

/// Open the relational store. An explicit `sql_dialect` wins over the
/// dialect implied by `--db`.
pub async fn connect(default_dialect: SqlDialect, config: &StoreConfig) -> Result<Arc<dyn ItemStore>> {
    let dialect = match config.sql_dialect.as_deref() {
        Some(name) => name.parse()?,
        None => default_dialect,
    };

    let connection_string = config.sql_connection_string.as_deref().ok_or_else(|| {
        StoreError::Config("SQL_CONNECTION_STRING is not set".to_string())
    })?;

    info!("Using {} SQL dialect", dialect);

    let store: Arc<dyn ItemStore> = match dialect {
        SqlDialect::Sqlite => Arc::new(SqliteItemStore::open(connection_string).await?),
        SqlDialect::MySql => Arc::new(MySqlItemStore::open(connection_string).await?),
    };
    Ok(store)
}

pub(crate) fn db_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolClosed => StoreError::Closed,
        other => StoreError::database(other),
    }
}
