//! Persistence of favorite stops, one document per user.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use nasta_tag_transit::identifiers::{StopKey, UserIdentifier};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::favorites::FavoritesError;

/// Collection name of the favorites documents
pub const FAVORITE_STOPS: &str = "favorite_stops";

/// Persisted favorites document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFavorites {
    pub id: String,
    pub name: String,
    pub data: Vec<StopKey>,
    pub user_id: UserIdentifier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredFavorites {
    pub fn new(user: &UserIdentifier, data: Vec<StopKey>, now: DateTime<Utc>) -> Self {
        Self {
            id: user.to_string(),
            name: FAVORITE_STOPS.to_owned(),
            data,
            user_id: user.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails unless the document belongs to `user`
    pub fn ensure_owned_by(&self, user: &UserIdentifier) -> Result<(), FavoritesError> {
        if &self.user_id != user {
            return Err(FavoritesError::Unauthorized {
                requested: user.clone(),
                owner: self.user_id.clone(),
            });
        }
        Ok(())
    }
}

/// Per-user document store for favorites.
///
/// `load` returns whatever is stored under the user's key; ownership is
/// checked by the caller.
pub trait FavoritesPersistence: Send + Sync {
    fn load<'a>(
        &'a self,
        user: &'a UserIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Option<StoredFavorites>, FavoritesError>> + Send + 'a>>;

    fn save<'a>(
        &'a self,
        user: &'a UserIdentifier,
        document: &'a StoredFavorites,
    ) -> Pin<Box<dyn Future<Output = Result<(), FavoritesError>> + Send + 'a>>;
}

/// Load the user's document, rejecting one owned by somebody else
pub async fn load_owned(
    persistence: &dyn FavoritesPersistence,
    user: &UserIdentifier,
) -> Result<Option<StoredFavorites>, FavoritesError> {
    let document = persistence.load(user).await?;
    if let Some(document) = &document {
        document.ensure_owned_by(user)?;
    }
    Ok(document)
}

/// Create the document on first save, afterwards only replace the data and
/// bump `updated_at`.
pub async fn upsert(
    persistence: &dyn FavoritesPersistence,
    user: &UserIdentifier,
    data: Vec<StopKey>,
) -> Result<StoredFavorites, FavoritesError> {
    let now = Utc::now();
    let document = match load_owned(persistence, user).await? {
        Some(existing) => StoredFavorites {
            data,
            updated_at: now,
            ..existing
        },
        None => StoredFavorites::new(user, data, now),
    };

    persistence.save(user, &document).await?;
    Ok(document)
}

/// Process-local store, lost on exit
#[derive(Default)]
pub struct InMemoryPersistence {
    documents: RwLock<HashMap<UserIdentifier, StoredFavorites>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed documents keyed by user, bypassing ownership checks
    pub fn with_documents(
        documents: impl IntoIterator<Item = (UserIdentifier, StoredFavorites)>,
    ) -> Self {
        Self {
            documents: RwLock::new(documents.into_iter().collect()),
        }
    }
}

impl FavoritesPersistence for InMemoryPersistence {
    fn load<'a>(
        &'a self,
        user: &'a UserIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Option<StoredFavorites>, FavoritesError>> + Send + 'a>>
    {
        Box::pin(async move { Ok(self.documents.read().await.get(user).cloned()) })
    }

    fn save<'a>(
        &'a self,
        user: &'a UserIdentifier,
        document: &'a StoredFavorites,
    ) -> Pin<Box<dyn Future<Output = Result<(), FavoritesError>> + Send + 'a>> {
        Box::pin(async move {
            self.documents
                .write()
                .await
                .insert(user.clone(), document.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: &[&str]) -> Vec<StopKey> {
        keys.iter().map(|key| StopKey::new(key)).collect()
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let persistence = InMemoryPersistence::new();
        let user = UserIdentifier::new("alice");

        let created = upsert(&persistence, &user, keys(&["Slussen_1"])).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.name, FAVORITE_STOPS);

        let updated = upsert(&persistence, &user, keys(&["Slussen_1", "Odenplan_"]))
            .await
            .unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.data, keys(&["Slussen_1", "Odenplan_"]));

        let stored = persistence.load(&user).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_foreign_document_is_unauthorized() {
        let alice = UserIdentifier::new("alice");
        let mallory = UserIdentifier::new("mallory");
        let persistence = InMemoryPersistence::with_documents([(
            alice.clone(),
            StoredFavorites::new(&mallory, keys(&["Slussen_1"]), Utc::now()),
        )]);

        let result = load_owned(&persistence, &alice).await;
        assert!(matches!(result, Err(FavoritesError::Unauthorized { .. })));

        let result = upsert(&persistence, &alice, Vec::new()).await;
        assert!(matches!(result, Err(FavoritesError::Unauthorized { .. })));
    }

    #[test]
    fn test_document_json_shape() {
        let user = UserIdentifier::new("alice");
        let document = StoredFavorites::new(&user, keys(&["Slussen_1"]), Utc::now());
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["userId"], "alice");
        assert_eq!(json["data"][0], "Slussen_1");
        assert!(json.get("createdAt").is_some());
    }
}
