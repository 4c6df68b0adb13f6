//! Error types for item storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unable to find item with id {id}")]
    ItemNotFound { id: String },

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store is closed")]
    Closed,
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::ItemNotFound { id: id.into() }
    }

    /// Wrap any backend error as a generic database failure
    pub fn database(e: impl std::fmt::Display) -> Self {
        StoreError::Database(e.to_string())
    }

    pub fn connection(e: impl std::fmt::Display) -> Self {
        StoreError::Connection(e.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ItemNotFound { .. })
    }
}
