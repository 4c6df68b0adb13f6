//! Todo Core Library
//!
//! Domain types, the storage port and the error taxonomy for the todo service.

// Re-export pure types from todo-types
pub use todo_types::*;

pub mod error;
pub mod ports;

pub use error::{Result, StoreError};
pub use ports::ItemStore;
