// ── Dex facade ──
//
// The entry point consumers hold. Owns the API client, the local store,
// and the four managers, and coordinates the cross-manager flows (facet
// toggles routing filtered results into the catalog, session warm-up).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use pokedex_api::{PokeApiClient, TransportConfig};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::favorites::Favorites;
use crate::filter::{FilterManager, Selection};
use crate::storage::Storage;
use crate::teams::TeamRoster;

/// Runtime configuration for a [`Dex`].
#[derive(Debug, Clone)]
pub struct DexConfig {
    /// API base URL (e.g. `https://pokeapi.co/api/v2/`).
    pub api_url: String,
    /// Page size for the default listing.
    pub page_size: u32,
    /// Request timeout.
    pub timeout: Duration,
    /// Age beyond which the type-enriched snapshot is treated as absent.
    pub snapshot_ttl: chrono::Duration,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api_url: "https://pokeapi.co/api/v2/".into(),
            page_size: 25,
            timeout: Duration::from_secs(30),
            snapshot_ttl: chrono::Duration::hours(168),
        }
    }
}

/// Owns and wires the managers. Cheap to share behind an `Arc`.
pub struct Dex {
    client: Arc<PokeApiClient>,
    storage: Arc<dyn Storage>,
    catalog: Catalog,
    filter: FilterManager,
    favorites: Favorites,
    item_favorites: Favorites,
    teams: TeamRoster,
}

impl Dex {
    /// Build a Dex from configuration and a storage backend.
    pub fn new(config: &DexConfig, storage: Arc<dyn Storage>) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = Arc::new(PokeApiClient::new(&config.api_url, &transport)?);
        Ok(Self::with_client(client, storage, config.page_size, config.snapshot_ttl))
    }

    /// Build a Dex around an existing client (test seam).
    pub fn with_client(
        client: Arc<PokeApiClient>,
        storage: Arc<dyn Storage>,
        page_size: u32,
        snapshot_ttl: chrono::Duration,
    ) -> Self {
        let filter = FilterManager::new(client.clone(), storage.clone(), snapshot_ttl);
        let catalog = Catalog::new(
            client.clone(),
            storage.clone(),
            page_size,
            filter.subscribe_active(),
        );
        let favorites = Favorites::pokemon(client.clone(), storage.clone());
        let item_favorites = Favorites::items(client.clone(), storage.clone());
        let teams = TeamRoster::new(storage.clone());

        Self {
            client,
            storage,
            catalog,
            filter,
            favorites,
            item_favorites,
            teams,
        }
    }

    // ── Manager access ───────────────────────────────────────────────

    pub fn client(&self) -> &Arc<PokeApiClient> {
        &self.client
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterManager {
        &self.filter
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn item_favorites(&self) -> &Favorites {
        &self.item_favorites
    }

    pub fn teams(&self) -> &TeamRoster {
        &self.teams
    }

    // ── Session warm-up ──────────────────────────────────────────────

    /// Restore everything persisted: favorites, teams, filter selection,
    /// and the cached page (fetching the first page when no cache
    /// exists). Remote failures degrade to empty state with a warning.
    pub async fn init(&self) {
        self.favorites.load().await;
        self.item_favorites.load().await;
        self.teams.load().await;
        self.init_catalog().await;
    }

    /// Restore only what the catalog view needs: the filter selection
    /// (so pagination suppression is correct) and the page cache.
    pub async fn init_catalog(&self) {
        self.filter.load_selection().await;

        match self.catalog.restore_cached_page().await {
            Ok(true) => debug!("restored cached page"),
            Ok(false) => {
                if let Err(e) = self.catalog.load_page(None).await {
                    warn!(error = %e, "initial page load failed");
                }
            }
            Err(e) => warn!(error = %e, "page cache restore failed"),
        }
    }

    // ── Cross-manager flows ──────────────────────────────────────────

    /// Toggle a type facet and re-route the visible list.
    pub async fn toggle_type(&self, name: &str) -> Result<Selection, CoreError> {
        self.filter.load_facets().await?;
        let selection = self.filter.toggle_type(name).await?;
        self.apply_selection().await?;
        Ok(selection)
    }

    /// Toggle a generation facet and re-route the visible list.
    pub async fn toggle_generation(&self, name: &str) -> Result<Selection, CoreError> {
        self.filter.load_facets().await?;
        let selection = self.filter.toggle_generation(name).await?;
        self.apply_selection().await?;
        Ok(selection)
    }

    /// Clear the selection and reload the unfiltered first page.
    pub async fn clear_filters(&self) -> Result<(), CoreError> {
        self.filter.clear().await;
        self.catalog.load_page(None).await
    }

    /// Recompute the filtered set and present it, or fall back to the
    /// unfiltered page when the selection is empty or every filter path
    /// failed. Carries a catalog request token so a slow computation
    /// cannot overwrite the result of a newer operation.
    pub async fn apply_selection(&self) -> Result<(), CoreError> {
        if !self.filter.is_active() {
            return self.catalog.load_page(None).await;
        }

        let token = self.catalog.begin_request();
        match self.filter.compute().await {
            Ok(list) => {
                if self.catalog.is_latest(token) {
                    self.catalog.set_filtered(list);
                } else {
                    debug!(token, "discarding stale filter result");
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "filter computation failed; clearing filters");
                self.filter.clear().await;
                self.catalog.load_page(None).await
            }
        }
    }
}
