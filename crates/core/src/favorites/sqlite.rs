//! SQLite-backed favorites, one row per user.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use nasta_tag_transit::identifiers::{StopKey, UserIdentifier};
use rusqlite::{Connection, OptionalExtension, params};

use crate::favorites::FavoritesError;
use crate::favorites::persistence::{FavoritesPersistence, StoredFavorites};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS favorite_stops (
        doc_id     TEXT PRIMARY KEY,
        id         TEXT NOT NULL,
        name       TEXT NOT NULL,
        owner_id   TEXT NOT NULL,
        data       TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )";

pub struct SqlitePersistence {
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePersistence {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FavoritesError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, FavoritesError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(connection: Connection) -> Result<Self, FavoritesError> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run a blocking closure against the connection off the async runtime
    async fn with_connection<T, F>(&self, f: F) -> Result<T, FavoritesError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, FavoritesError> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| FavoritesError::Storage("sqlite connection poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| FavoritesError::Storage(e.to_string()))?
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, DateTime<Utc>, DateTime<Utc>)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

impl FavoritesPersistence for SqlitePersistence {
    fn load<'a>(
        &'a self,
        user: &'a UserIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Option<StoredFavorites>, FavoritesError>> + Send + 'a>>
    {
        let doc_id = user.to_string();
        Box::pin(self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    "SELECT id, name, owner_id, data, created_at, updated_at
                     FROM favorite_stops WHERE doc_id = ?1",
                    params![doc_id],
                    read_row,
                )
                .optional()?;

            let Some((id, name, owner_id, data, created_at, updated_at)) = row else {
                return Ok(None);
            };

            let data: Vec<StopKey> = serde_json::from_str(&data)?;
            Ok(Some(StoredFavorites {
                id,
                name,
                data,
                user_id: UserIdentifier::new(owner_id),
                created_at,
                updated_at,
            }))
        }))
    }

    fn save<'a>(
        &'a self,
        user: &'a UserIdentifier,
        document: &'a StoredFavorites,
    ) -> Pin<Box<dyn Future<Output = Result<(), FavoritesError>> + Send + 'a>> {
        let doc_id = user.to_string();
        let document = document.clone();
        Box::pin(self.with_connection(move |connection| {
            let data = serde_json::to_string(&document.data)?;
            connection.execute(
                "INSERT INTO favorite_stops (doc_id, id, name, owner_id, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(doc_id) DO UPDATE SET
                    data = excluded.data,
                    updated_at = excluded.updated_at",
                params![
                    doc_id,
                    document.id,
                    document.name,
                    document.user_id.as_str(),
                    data,
                    document.created_at,
                    document.updated_at,
                ],
            )?;
            Ok(())
        }))
    }
}
