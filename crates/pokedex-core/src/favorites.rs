// ── Favorites store ──
//
// A persisted set of entity identifiers plus a lazily-hydrated list of
// full records. One instance per entity kind (pokemon, items); the id
// spaces are disjoint so the instances never interact.

use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::IndexSet;
use tokio::sync::watch;
use tracing::warn;

use pokedex_api::{PokeApiClient, Resource};

use crate::error::CoreError;
use crate::model::Entity;
use crate::storage::{Storage, keys, read_json, write_json};

/// Persisted favorite-id set with on-demand hydration.
pub struct Favorites {
    client: Arc<PokeApiClient>,
    storage: Arc<dyn Storage>,
    resource: Resource,
    ids_key: &'static str,
    hydrated_key: &'static str,

    ids: watch::Sender<IndexSet<u64>>,
    hydrated: watch::Sender<Arc<Vec<Entity>>>,
}

impl Favorites {
    /// Favorites over the pokemon catalog.
    pub fn pokemon(client: Arc<PokeApiClient>, storage: Arc<dyn Storage>) -> Self {
        Self::with_keys(
            client,
            storage,
            Resource::Pokemon,
            keys::FAVORITE_POKEMON,
            keys::FAVORITE_POKEMON_HYDRATED,
        )
    }

    /// Favorites over the item catalog.
    pub fn items(client: Arc<PokeApiClient>, storage: Arc<dyn Storage>) -> Self {
        Self::with_keys(
            client,
            storage,
            Resource::Item,
            keys::FAVORITE_ITEMS,
            keys::FAVORITE_ITEMS_HYDRATED,
        )
    }

    fn with_keys(
        client: Arc<PokeApiClient>,
        storage: Arc<dyn Storage>,
        resource: Resource,
        ids_key: &'static str,
        hydrated_key: &'static str,
    ) -> Self {
        let (ids, _) = watch::channel(IndexSet::new());
        let (hydrated, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            client,
            storage,
            resource,
            ids_key,
            hydrated_key,
            ids,
            hydrated,
        }
    }

    /// The entity kind this instance tracks.
    pub fn resource(&self) -> Resource {
        self.resource
    }

    // ── Session restore ──────────────────────────────────────────────

    /// Restore the persisted id set and hydrated cache. Never writes.
    pub async fn load(&self) {
        let ids: Option<Vec<u64>> = read_json(self.storage.as_ref(), self.ids_key)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable favorite ids");
                None
            });
        if let Some(ids) = ids {
            self.ids.send_replace(ids.into_iter().collect());
        }

        let hydrated: Option<Vec<Entity>> = read_json(self.storage.as_ref(), self.hydrated_key)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable hydrated favorites");
                None
            });
        if let Some(entities) = hydrated {
            self.hydrated.send_replace(Arc::new(entities));
        }
    }

    // ── Membership ───────────────────────────────────────────────────

    pub fn contains(&self, id: u64) -> bool {
        self.ids.borrow().contains(&id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.ids.borrow().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    /// Add an id to the set. Set semantics: adding a present id is a
    /// no-op. Returns whether the set changed; changes are persisted.
    pub async fn add(&self, id: u64) -> bool {
        let mut changed = false;
        self.ids.send_modify(|ids| changed = ids.insert(id));
        if changed {
            self.persist_ids().await;
        }
        changed
    }

    /// Remove an id from the set. Removing an absent id is a no-op.
    /// Returns whether the set changed; changes are persisted.
    pub async fn remove(&self, id: u64) -> bool {
        let mut changed = false;
        self.ids.send_modify(|ids| changed = ids.shift_remove(&id));
        if changed {
            self.persist_ids().await;
        }
        changed
    }

    async fn persist_ids(&self) {
        let ids: Vec<u64> = self.ids();
        if let Err(e) = write_json(self.storage.as_ref(), self.ids_key, &ids).await {
            warn!(error = %e, "failed to persist favorite ids");
        }
    }

    // ── Hydration ────────────────────────────────────────────────────

    /// The most recently hydrated record list (possibly stale relative
    /// to the id set).
    pub fn hydrated(&self) -> Arc<Vec<Entity>> {
        self.hydrated.borrow().clone()
    }

    /// Fetch the full record for every favorite id, in parallel,
    /// all-or-nothing: if any single fetch fails the previous hydrated
    /// list is retained and the error is returned.
    pub async fn hydrate(&self) -> Result<Arc<Vec<Entity>>, CoreError> {
        let ids = self.ids();
        let fetches = ids.into_iter().map(|id| self.fetch_entity(id));
        let entities = Arc::new(try_join_all(fetches).await?);

        self.hydrated.send_replace(entities.clone());
        if let Err(e) = write_json(self.storage.as_ref(), self.hydrated_key, &*entities).await {
            warn!(error = %e, "failed to persist hydrated favorites");
        }
        Ok(entities)
    }

    /// Fetch one record and re-key it by its canonical URL.
    async fn fetch_entity(&self, id: u64) -> Result<Entity, CoreError> {
        let key = id.to_string();
        let (id, name) = match self.resource {
            Resource::Item => {
                let item = self.client.get_item(&key).await?;
                (item.id, item.name)
            }
            _ => {
                let details = self.client.get_pokemon(&key).await?;
                (details.id, details.name)
            }
        };
        Ok(Entity::new(name, self.client.canonical_url(self.resource, id)))
    }
}
