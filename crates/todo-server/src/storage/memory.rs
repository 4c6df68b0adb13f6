//! In-memory item store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use todo_core::{Item, ItemStore, Result, StoreError};

/// Item store that lives in process memory.
///
/// Ids are sequential integers starting at 1, like the SQLite backend, and
/// `all_items` returns items in creation order.
#[derive(Debug)]
pub struct MemoryItemStore {
    data: DashMap<u64, Entry>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

#[derive(Debug, Clone)]
struct Entry {
    description: String,
    completed: bool,
}

impl Entry {
    fn to_item(&self, id: u64) -> Item {
        Item {
            id: id.to_string(),
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        self.ensure_open()?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            description: item.description.clone(),
            completed: item.completed,
        };
        let created = entry.to_item(id);
        self.data.insert(id, entry);

        Ok(created)
    }

    async fn get_item(&self, id: &str) -> Result<Item> {
        self.ensure_open()?;
        let key = parse_id(id)?;

        self.data
            .get(&key)
            .map(|entry| entry.to_item(key))
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn update_item(&self, id: &str, item: &Item) -> Result<Item> {
        self.ensure_open()?;
        let key = parse_id(id)?;

        let mut entry = self
            .data
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found(id))?;
        entry.description = item.description.clone();
        entry.completed = item.completed;

        Ok(entry.to_item(key))
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        self.ensure_open()?;
        let key = parse_id(id)?;

        self.data
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn all_items(&self) -> Result<Vec<Item>> {
        self.ensure_open()?;

        let mut entries: Vec<(u64, Entry)> = self
            .data
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);

        Ok(entries
            .into_iter()
            .map(|(id, entry)| entry.to_item(id))
            .collect())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.data.clear();
    }
}

fn parse_id(id: &str) -> Result<u64> {
    id.parse::<u64>()
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}
