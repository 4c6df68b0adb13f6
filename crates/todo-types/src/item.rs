//! Item types

use serde::{Deserialize, Serialize};

/// A to-do record.
///
/// The `id` is assigned by the store when the item is created and is always
/// a string on the wire, whatever the backend's native id type is.
/// Deserialization is lenient: every field is optional, unknown fields are
/// ignored and lowercase field names are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
    #[serde(rename = "Description", alias = "description")]
    pub description: String,
    #[serde(rename = "Completed", alias = "completed")]
    pub completed: bool,
}

impl Item {
    /// Create an item that has not been stored yet (empty id)
    pub fn new(description: impl Into<String>, completed: bool) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            completed,
        }
    }

    /// Return a copy of this item carrying the given id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
