// ── Filter selection manager ──
//
// Tracks the active type/generation facets, caches the facet catalogs,
// and computes the filtered entity list. Type selection intersects
// (AND); generation selection unions (OR); combining the two facet
// kinds intersects the two computed sets.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use pokedex_api::{PokeApiClient, Resource};

use crate::error::CoreError;
use crate::model::{Entity, TypedEntity, TypedSnapshot, extract_id};
use crate::storage::{Storage, keys, read_json, write_json};

// ── Selection ───────────────────────────────────────────────────────

/// The persisted facet selection. Both sets empty means filtering is
/// inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub types: IndexSet<String>,
    #[serde(default)]
    pub generations: IndexSet<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.generations.is_empty()
    }
}

/// Which facet set a toggle targets.
#[derive(Debug, Clone, Copy)]
enum FacetKind {
    Type,
    Generation,
}

// ── Manager ─────────────────────────────────────────────────────────

/// Owns the facet catalogs, the active selection, and the filtering
/// flag the catalog manager observes.
pub struct FilterManager {
    client: Arc<PokeApiClient>,
    storage: Arc<dyn Storage>,
    snapshot_ttl: chrono::Duration,

    types_catalog: watch::Sender<Arc<Vec<Entity>>>,
    generations_catalog: watch::Sender<Arc<Vec<Entity>>>,
    selection: watch::Sender<Selection>,
    active: watch::Sender<bool>,
}

impl FilterManager {
    pub fn new(
        client: Arc<PokeApiClient>,
        storage: Arc<dyn Storage>,
        snapshot_ttl: chrono::Duration,
    ) -> Self {
        let (types_catalog, _) = watch::channel(Arc::new(Vec::new()));
        let (generations_catalog, _) = watch::channel(Arc::new(Vec::new()));
        let (selection, _) = watch::channel(Selection::default());
        let (active, _) = watch::channel(false);

        Self {
            client,
            storage,
            snapshot_ttl,
            types_catalog,
            generations_catalog,
            selection,
            active,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn selection(&self) -> Selection {
        self.selection.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Receiver for the filtering flag; the catalog manager suppresses
    /// pagination while it reads true.
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    pub fn types_catalog(&self) -> Arc<Vec<Entity>> {
        self.types_catalog.borrow().clone()
    }

    pub fn generations_catalog(&self) -> Arc<Vec<Entity>> {
        self.generations_catalog.borrow().clone()
    }

    // ── Session restore ──────────────────────────────────────────────

    /// Restore the persisted selection. Never writes back.
    pub async fn load_selection(&self) {
        let stored: Option<Selection> = read_json(self.storage.as_ref(), keys::FILTER_SELECTION)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable filter selection");
                None
            });

        if let Some(selection) = stored {
            self.active.send_replace(!selection.is_empty());
            self.selection.send_replace(selection);
        }
    }

    /// Fetch the type and generation catalogs once, caching them in the
    /// local store for reuse across sessions.
    pub async fn load_facets(&self) -> Result<(), CoreError> {
        if self.types_catalog.borrow().is_empty() {
            let types = self
                .load_facet_catalog(Resource::Type, keys::TYPE_CATALOG)
                .await?;
            self.types_catalog.send_replace(Arc::new(types));
        }
        if self.generations_catalog.borrow().is_empty() {
            let generations = self
                .load_facet_catalog(Resource::Generation, keys::GENERATION_CATALOG)
                .await?;
            self.generations_catalog.send_replace(Arc::new(generations));
        }
        Ok(())
    }

    async fn load_facet_catalog(
        &self,
        resource: Resource,
        key: &str,
    ) -> Result<Vec<Entity>, CoreError> {
        let cached: Option<Vec<Entity>> =
            read_json(self.storage.as_ref(), key).await.unwrap_or_else(|e| {
                warn!(error = %e, key, "ignoring unreadable facet catalog");
                None
            });
        if let Some(entities) = cached {
            return Ok(entities);
        }

        let page = self.client.list_all(resource).await?;
        let entities: Vec<Entity> = page.results.into_iter().map(Entity::from).collect();

        if let Err(e) = write_json(self.storage.as_ref(), key, &entities).await {
            warn!(error = %e, key, "failed to cache facet catalog");
        }
        Ok(entities)
    }

    // ── Selection mutation ───────────────────────────────────────────

    /// Toggle a type facet. The name must exist in the type catalog.
    /// Returns the updated selection.
    pub async fn toggle_type(&self, name: &str) -> Result<Selection, CoreError> {
        if !self.types_catalog.borrow().iter().any(|t| t.name == name) {
            return Err(CoreError::UnknownFacet {
                facet: "type",
                name: name.to_owned(),
            });
        }
        Ok(self.toggle(name, FacetKind::Type).await)
    }

    /// Toggle a generation facet. The name must exist in the generation
    /// catalog. Returns the updated selection.
    pub async fn toggle_generation(&self, name: &str) -> Result<Selection, CoreError> {
        if !self
            .generations_catalog
            .borrow()
            .iter()
            .any(|g| g.name == name)
        {
            return Err(CoreError::UnknownFacet {
                facet: "generation",
                name: name.to_owned(),
            });
        }
        Ok(self.toggle(name, FacetKind::Generation).await)
    }

    async fn toggle(&self, name: &str, kind: FacetKind) -> Selection {
        let mut selection = self.selection.borrow().clone();
        let set = match kind {
            FacetKind::Type => &mut selection.types,
            FacetKind::Generation => &mut selection.generations,
        };
        if !set.shift_remove(name) {
            set.insert(name.to_owned());
        }

        self.active.send_replace(!selection.is_empty());
        self.selection.send_replace(selection.clone());
        self.persist_selection(&selection).await;
        selection
    }

    /// Empty both facet sets and deactivate filtering. The caller is
    /// expected to reload the unfiltered page.
    pub async fn clear(&self) {
        let selection = Selection::default();
        self.active.send_replace(false);
        self.selection.send_replace(selection.clone());
        self.persist_selection(&selection).await;
    }

    async fn persist_selection(&self, selection: &Selection) {
        if let Err(e) = write_json(self.storage.as_ref(), keys::FILTER_SELECTION, selection).await {
            warn!(error = %e, "failed to persist filter selection");
        }
    }

    // ── Result computation ───────────────────────────────────────────

    /// Compute the entity list for the current selection.
    ///
    /// Empty selection yields an empty list (filtering inactive). A
    /// combined type+generation computation that fails degrades to
    /// type-only, then generation-only filtering before giving up.
    pub async fn compute(&self) -> Result<Vec<Entity>, CoreError> {
        let selection = self.selection.borrow().clone();
        match (
            selection.types.is_empty(),
            selection.generations.is_empty(),
        ) {
            (true, true) => Ok(Vec::new()),
            (false, true) => self.by_types(&selection.types).await,
            (true, false) => self.by_generations(&selection.generations).await,
            (false, false) => match self.combined(&selection).await {
                Ok(list) => Ok(list),
                Err(e) => {
                    warn!(error = %e, "combined filter failed; degrading to type-only");
                    match self.by_types(&selection.types).await {
                        Ok(list) => Ok(list),
                        Err(e2) => {
                            warn!(error = %e2, "type filter failed; degrading to generation-only");
                            self.by_generations(&selection.generations).await
                        }
                    }
                }
            },
        }
    }

    /// Intersection (AND) of per-type member lists, keyed by id, in the
    /// order of the first list.
    async fn by_types(&self, types: &IndexSet<String>) -> Result<Vec<Entity>, CoreError> {
        let fetches = types.iter().map(|name| self.client.get_type(name));
        let details = try_join_all(fetches).await?;

        let lists: Vec<Vec<Entity>> = details
            .into_iter()
            .map(|t| t.pokemon.into_iter().map(|m| Entity::from(m.pokemon)).collect())
            .collect();

        Ok(intersect_by_id(lists))
    }

    /// Union (OR) of per-generation species lists, each species re-mapped
    /// from its species URL to the canonical pokemon URL.
    async fn by_generations(
        &self,
        generations: &IndexSet<String>,
    ) -> Result<Vec<Entity>, CoreError> {
        let fetches = generations.iter().map(|name| self.client.get_generation(name));
        let details = try_join_all(fetches).await?;

        let mut combined = Vec::new();
        for generation in details {
            for species in generation.pokemon_species {
                let Some(id) = extract_id(&species.url) else {
                    debug!(url = %species.url, "skipping species with unparsable id");
                    continue;
                };
                combined.push(Entity::new(
                    species.name,
                    self.client.canonical_url(Resource::Pokemon, id),
                ));
            }
        }
        Ok(combined)
    }

    /// Both facet kinds: AND between the type-computed set and the
    /// generation-computed set. Uses the enriched snapshot when a fresh
    /// one is cached, the per-type API path otherwise.
    async fn combined(&self, selection: &Selection) -> Result<Vec<Entity>, CoreError> {
        let generation_side = self.by_generations(&selection.generations).await?;

        let type_side = match self.typed_snapshot().await {
            Some(snapshot) => filter_typed(&snapshot.entries, &selection.types),
            None => self.by_types(&selection.types).await?,
        };

        Ok(intersect_by_name(type_side, &generation_side))
    }

    // ── Enriched snapshot ────────────────────────────────────────────

    /// The cached type-enriched snapshot, or `None` when absent or
    /// older than the TTL.
    pub async fn typed_snapshot(&self) -> Option<TypedSnapshot> {
        let snapshot: TypedSnapshot = read_json(self.storage.as_ref(), keys::TYPED_SNAPSHOT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable typed snapshot");
                None
            })?;

        if snapshot.is_fresh(self.snapshot_ttl) {
            Some(snapshot)
        } else {
            debug!("typed snapshot is stale; treating as absent");
            None
        }
    }

    /// Build the type-enriched snapshot by tagging every entity in
    /// `entities` with its type names (one request per type in the
    /// catalog). `progress` is called after each type completes.
    pub async fn build_typed_snapshot(
        &self,
        entities: &[Entity],
        mut progress: impl FnMut(usize, usize) + Send,
    ) -> Result<usize, CoreError> {
        self.load_facets().await?;
        let type_names: Vec<String> = self
            .types_catalog
            .borrow()
            .iter()
            .map(|t| t.name.clone())
            .collect();

        let mut types_by_id: HashMap<u64, Vec<String>> = HashMap::new();
        let total = type_names.len();
        for (done, name) in type_names.iter().enumerate() {
            let details = self.client.get_type(name).await?;
            for member in details.pokemon {
                if let Some(id) = extract_id(&member.pokemon.url) {
                    types_by_id.entry(id).or_default().push(name.clone());
                }
            }
            progress(done + 1, total);
        }

        let entries: Vec<TypedEntity> = entities
            .iter()
            .map(|e| TypedEntity {
                name: e.name.clone(),
                url: e.url.clone(),
                types: e.id().and_then(|id| types_by_id.get(&id).cloned()).unwrap_or_default(),
            })
            .collect();

        let count = entries.len();
        let snapshot = TypedSnapshot::new(entries);
        write_json(self.storage.as_ref(), keys::TYPED_SNAPSHOT, &snapshot).await?;
        Ok(count)
    }
}

// ── Pure set algebra ────────────────────────────────────────────────

/// Intersect entity lists by id (AND), preserving the first list's order.
fn intersect_by_id(lists: Vec<Vec<Entity>>) -> Vec<Entity> {
    let mut iter = lists.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    iter.fold(first, |acc, next| {
        let ids: HashSet<u64> = next.iter().filter_map(Entity::id).collect();
        acc.into_iter()
            .filter(|e| e.id().is_some_and(|id| ids.contains(&id)))
            .collect()
    })
}

/// Keep entries of `left` whose name appears in `right`.
fn intersect_by_name(left: Vec<Entity>, right: &[Entity]) -> Vec<Entity> {
    let names: HashSet<&str> = right.iter().map(|e| e.name.as_str()).collect();
    left.into_iter()
        .filter(|e| names.contains(e.name.as_str()))
        .collect()
}

/// Entries carrying every selected type (AND across multiple types).
fn filter_typed(entries: &[TypedEntity], types: &IndexSet<String>) -> Vec<Entity> {
    entries
        .iter()
        .filter(|e| e.has_all_types(types.iter().map(String::as_str)))
        .map(TypedEntity::to_entity)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mon(id: u64, name: &str) -> Entity {
        Entity::new(name, format!("https://pokeapi.co/api/v2/pokemon/{id}/"))
    }

    fn typed(id: u64, name: &str, types: &[&str]) -> TypedEntity {
        TypedEntity {
            name: name.into(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            types: types.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    #[test]
    fn intersect_single_list_passes_through() {
        let fire = vec![mon(4, "charmander"), mon(6, "charizard")];
        assert_eq!(intersect_by_id(vec![fire.clone()]), fire);
    }

    #[test]
    fn intersect_uses_and_semantics() {
        // A: fire, B: fire+flying, C: water
        let fire = vec![mon(1, "a"), mon(2, "b")];
        let flying = vec![mon(2, "b"), mon(3, "d")];

        let both = intersect_by_id(vec![fire.clone(), flying]);
        assert_eq!(both, vec![mon(2, "b")]);

        let water = vec![mon(3, "c")];
        assert!(intersect_by_id(vec![fire, water]).is_empty());
    }

    #[test]
    fn intersect_preserves_first_list_order() {
        let first = vec![mon(3, "c"), mon(1, "a"), mon(2, "b")];
        let second = vec![mon(1, "a"), mon(2, "b"), mon(3, "c")];

        let result = intersect_by_id(vec![first, second]);
        let ids: Vec<u64> = result.iter().filter_map(Entity::id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn intersect_empty_input_is_empty() {
        assert!(intersect_by_id(Vec::new()).is_empty());
    }

    #[test]
    fn name_intersection() {
        let left = vec![mon(1, "bulbasaur"), mon(7, "squirtle")];
        let right = vec![mon(7, "squirtle")];
        assert_eq!(intersect_by_name(left, &right), vec![mon(7, "squirtle")]);
    }

    #[test]
    fn typed_filter_requires_every_selected_type() {
        let entries = vec![
            typed(4, "charmander", &["fire"]),
            typed(6, "charizard", &["fire", "flying"]),
            typed(7, "squirtle", &["water"]),
        ];

        let fire: IndexSet<String> = ["fire".to_owned()].into_iter().collect();
        let names: Vec<String> = filter_typed(&entries, &fire)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["charmander", "charizard"]);

        let fire_flying: IndexSet<String> =
            ["fire".to_owned(), "flying".to_owned()].into_iter().collect();
        let names: Vec<String> = filter_typed(&entries, &fire_flying)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["charizard"]);
    }

    #[test]
    fn selection_emptiness() {
        let mut sel = Selection::default();
        assert!(sel.is_empty());
        sel.generations.insert("generation-i".into());
        assert!(!sel.is_empty());
    }
}
