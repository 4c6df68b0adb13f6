//! Storage trait for item persistence

use crate::Result;
use async_trait::async_trait;
use todo_types::Item;

/// Item store
///
/// Every backend must behave identically at this interface: lookups of an
/// id with no record fail with [`StoreError::ItemNotFound`], ids that cannot
/// be parsed into the backend's native id type fail with
/// [`StoreError::InvalidId`], and every operation fails once [`close`] has
/// been called.
///
/// [`StoreError::ItemNotFound`]: crate::StoreError::ItemNotFound
/// [`StoreError::InvalidId`]: crate::StoreError::InvalidId
/// [`close`]: ItemStore::close
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Short backend name, used in logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Check that the underlying store is reachable
    async fn ping(&self) -> Result<()>;

    /// Persist a new item. Any id on the input is ignored.
    async fn create_item(&self, item: &Item) -> Result<Item>;

    async fn get_item(&self, id: &str) -> Result<Item>;

    /// Overwrite both `description` and `completed` of an existing item
    async fn update_item(&self, id: &str, item: &Item) -> Result<Item>;

    async fn delete_item(&self, id: &str) -> Result<()>;

    async fn all_items(&self) -> Result<Vec<Item>>;

    /// Release the connection. Call at most once.
    async fn close(&self);
}
