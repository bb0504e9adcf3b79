//! Favorite stops of the current user.
//!
//! The set is immutable: every toggle publishes a whole new [`FavoriteStops`]
//! through a watch channel, so observers see one atomic update. Favorites can
//! be toggled before sign-in; they are merged into the persisted set when the
//! user signs in.

pub mod persistence;
pub mod sqlite;

use std::collections::BTreeSet;
use std::sync::Arc;

use nasta_tag_transit::identifiers::{StopKey, UserIdentifier};
use tokio::sync::watch;
use tracing::{error, info, warn};

pub use persistence::{FavoritesPersistence, InMemoryPersistence, StoredFavorites};
pub use sqlite::SqlitePersistence;

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("unauthorized access to favorites of {requested} (owned by {owner})")]
    Unauthorized {
        requested: UserIdentifier,
        owner: UserIdentifier,
    },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Immutable set of favorited stop keys, cheap to clone
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoriteStops(Arc<BTreeSet<StopKey>>);

impl FavoriteStops {
    pub fn contains(&self, key: &StopKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StopKey> {
        self.0.iter()
    }

    /// A new set with `key` flipped; `self` is left untouched
    pub fn toggled(&self, key: &StopKey) -> Self {
        let mut next = (*self.0).clone();
        if !next.remove(key) {
            next.insert(key.clone());
        }
        Self(Arc::new(next))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(Arc::new(self.0.union(&other.0).cloned().collect()))
    }
}

impl FromIterator<StopKey> for FavoriteStops {
    fn from_iter<I: IntoIterator<Item = StopKey>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// Owner of the favorites set and of the signed-in session.
///
/// Only this store writes favorites; everything else subscribes.
pub struct FavoritesStore {
    persistence: Arc<dyn FavoritesPersistence>,
    user: Option<UserIdentifier>,
    favorites: watch::Sender<FavoriteStops>,
}

impl FavoritesStore {
    pub fn new(persistence: Arc<dyn FavoritesPersistence>) -> Self {
        let (favorites, _) = watch::channel(FavoriteStops::default());
        Self {
            persistence,
            user: None,
            favorites,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FavoriteStops> {
        self.favorites.subscribe()
    }

    pub fn current(&self) -> FavoriteStops {
        self.favorites.borrow().clone()
    }

    pub fn user(&self) -> Option<&UserIdentifier> {
        self.user.as_ref()
    }

    /// Flip membership of `key` and publish the new set.
    ///
    /// When signed in the new set is saved as well. A failed save is
    /// returned, but the toggle itself stays in effect.
    pub async fn toggle(&mut self, key: &StopKey) -> Result<FavoriteStops, FavoritesError> {
        let next = self.current().toggled(key);
        self.favorites.send_replace(next.clone());

        if let Some(user) = &self.user {
            if let Err(e) = persistence::upsert(&*self.persistence, user, next.iter().cloned().collect()).await {
                warn!(%user, error = %e, "saving favorites failed");
                return Err(e);
            }
        }

        Ok(next)
    }

    /// Load the user's favorites and merge the ones toggled so far into them.
    ///
    /// A document owned by a different user aborts the sign-in and leaves the
    /// current set untouched. If saving the merged set fails, the error is
    /// returned but the session stays signed in with the merged set, like a
    /// failed save after [`Self::toggle`].
    pub async fn sign_in(&mut self, user: UserIdentifier) -> Result<FavoriteStops, FavoritesError> {
        let stored = match persistence::load_owned(&*self.persistence, &user).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(%user, error = %e, "loading favorites failed");
                return Err(e);
            }
        };

        let stored: FavoriteStops = stored
            .map(|document| document.data.into_iter().collect())
            .unwrap_or_default();
        let merged = stored.union(&self.current());

        self.user = Some(user.clone());
        self.favorites.send_replace(merged.clone());
        info!(%user, favorites = merged.len(), "signed in");

        if merged != stored {
            let saved =
                persistence::upsert(&*self.persistence, &user, merged.iter().cloned().collect())
                    .await;
            if let Err(e) = saved {
                warn!(%user, error = %e, "saving merged favorites failed");
                return Err(e);
            }
        }

        Ok(merged)
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(%user, "signed out");
        }
        self.favorites.send_replace(FavoriteStops::default());
    }
}
