//! SQLite item store (embedded, no external server)

use super::db_error;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use todo_core::{Item, ItemStore, Result, StoreError};
use tracing::{debug, info};

#[derive(Debug)]
pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    /// Open a SQLite database from a file path, a `sqlite:` URL or `:memory:`
    pub async fn open(connection_string: &str) -> Result<Self> {
        info!("Opening SQLite database at: {}", connection_string);

        let in_memory = connection_string == ":memory:"
            || connection_string == "sqlite::memory:"
            || connection_string.contains("mode=memory");

        let options = if connection_string == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else if connection_string.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(connection_string)
        } else {
            Ok(SqliteConnectOptions::new().filename(connection_string))
        }
        .map_err(StoreError::connection)?
        .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so those pools hold exactly one connection forever.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(
                    options
                        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal),
                )
                .await
        }
        .map_err(|e| {
            StoreError::Connection(format!(
                "Failed to connect to SQLite database at {}: {}",
                connection_string, e
            ))
        })?;

        debug!("SQLite connection established, creating schema...");

        Self::run_migrations(&pool).await?;

        info!("SQLite item store ready");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL DEFAULT '',
                completed BOOLEAN NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| StoreError::Connection(format!("Failed to create items table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (description, completed)
            VALUES (?1, ?2)
            "#,
        )
        .bind(&item.description)
        .bind(item.completed)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let id = result.last_insert_rowid();
        debug!("Inserted item {}", id);

        Ok(Item {
            id: id.to_string(),
            description: item.description.clone(),
            completed: item.completed,
        })
    }

    async fn get_item(&self, id: &str) -> Result<Item> {
        let key = parse_id(id)?;

        let row: Option<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, description, completed FROM items WHERE id = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(Item::from).ok_or_else(|| StoreError::not_found(id))
    }

    async fn update_item(&self, id: &str, item: &Item) -> Result<Item> {
        let key = parse_id(id)?;

        let result = sqlx::query(
            r#"
            UPDATE items SET description = ?1, completed = ?2
            WHERE id = ?3
            "#,
        )
        .bind(&item.description)
        .bind(item.completed)
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(id));
        }

        Ok(Item {
            id: key.to_string(),
            description: item.description.clone(),
            completed: item.completed,
        })
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let key = parse_id(id)?;

        let result = sqlx::query(
            r#"
            DELETE FROM items WHERE id = ?1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(id));
        }

        debug!("Deleted item {}", key);
        Ok(())
    }

    async fn all_items(&self) -> Result<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, description, completed FROM items
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn close(&self) {
        info!("Closing SQLite item store");
        self.pool.close().await;
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    description: String,
    completed: bool,
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Item {
            id: r.id.to_string(),
            description: r.description,
            completed: r.completed,
        }
    }
}

fn parse_id(id: &str) -> Result<i64> {
    id.parse::<i64>()
        .map_err(|_| StoreError::InvalidId(id.to_string()))
}
