//! MongoDB item store
//!
//! Items are stored as documents keyed by the server-assigned `ObjectId`,
//! which is exposed as a 24-character hex string.

use crate::config::StoreConfig;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use todo_core::{Item, ItemStore, Result, StoreError};
use tracing::{debug, info};

#[derive(Debug)]
pub struct DocumentItemStore {
    client: Client,
    collection: Collection<ItemDocument>,
    closed: AtomicBool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    description: String,
    completed: bool,
}

impl ItemDocument {
    fn from_item(item: &Item) -> Self {
        Self {
            id: None,
            description: item.description.clone(),
            completed: item.completed,
        }
    }
}

impl From<ItemDocument> for Item {
    fn from(d: ItemDocument) -> Self {
        Item {
            id: d.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            description: d.description,
            completed: d.completed,
        }
    }
}

impl DocumentItemStore {
    /// Connect to the server named by `MONGODB_CONNECTION_STRING` and check
    /// it answers a ping.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let uri = config.mongodb_connection_string.as_deref().ok_or_else(|| {
            StoreError::Config("MONGODB_CONNECTION_STRING is not set".to_string())
        })?;

        info!("Connecting to MongoDB...");

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(StoreError::connection)?;
        options.app_name = Some("todo-server".to_string());

        let client = Client::with_options(options).map_err(StoreError::connection)?;

        client
            .database(&config.mongodb_database)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(StoreError::connection)?;

        let store = Self::with_client(client, &config.mongodb_database, &config.mongodb_collection);

        info!(
            "MongoDB item store ready: {}.{}",
            config.mongodb_database, config.mongodb_collection
        );

        Ok(store)
    }

    /// Wrap an existing client without contacting the server
    pub fn with_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client
            .database(database)
            .collection::<ItemDocument>(collection);

        Self {
            client,
            collection,
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

#[async_trait]
impl ItemStore for DocumentItemStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()?;
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(StoreError::database)?;
        Ok(())
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        self.ensure_open()?;

        let result = self
            .collection
            .insert_one(ItemDocument::from_item(item), None)
            .await
            .map_err(StoreError::database)?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Database(format!(
                "Inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;
        debug!("Inserted item {}", oid);

        Ok(Item {
            id: oid.to_hex(),
            description: item.description.clone(),
            completed: item.completed,
        })
    }

    async fn get_item(&self, id: &str) -> Result<Item> {
        self.ensure_open()?;
        let oid = parse_id(id)?;

        self.collection
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(StoreError::database)?
            .map(Item::from)
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn update_item(&self, id: &str, item: &Item) -> Result<Item> {
        self.ensure_open()?;
        let oid = parse_id(id)?;

        let update = doc! {
            "$set": {
                "description": item.description.as_str(),
                "completed": item.completed,
            }
        };

        let result = self
            .collection
            .update_one(doc! { "_id": oid }, update, None)
            .await
            .map_err(StoreError::database)?;

        if result.matched_count == 0 {
            return Err(StoreError::not_found(id));
        }

        Ok(Item {
            id: oid.to_hex(),
            description: item.description.clone(),
            completed: item.completed,
        })
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        self.ensure_open()?;
        let oid = parse_id(id)?;

        let result = self
            .collection
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(StoreError::database)?;

        if result.deleted_count == 0 {
            return Err(StoreError::not_found(id));
        }

        debug!("Deleted item {}", oid);
        Ok(())
    }

    async fn all_items(&self) -> Result<Vec<Item>> {
        self.ensure_open()?;

        let cursor = self
            .collection
            .find(doc! {}, None)
            .await
            .map_err(StoreError::database)?;

        let documents: Vec<ItemDocument> =
            cursor.try_collect().await.map_err(StoreError::database)?;

        Ok(documents.into_iter().map(Item::from).collect())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Closing MongoDB item store");
        self.client.clone().shutdown().await;
    }
}

fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}
