// ── Catalog cache manager ──
//
// Owns the currently visible page of the pokemon catalog, its
// pagination cursors, and the best-effort full snapshot used for local
// search. Facet filtering always wins over plain pagination: while the
// filter manager reports an active selection, the paging operations are
// suppressed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tokio::sync::watch;
use tracing::{debug, warn};

use pokedex_api::{PokeApiClient, Resource};

use crate::error::CoreError;
use crate::model::{Entity, PageState};
use crate::storage::{Storage, keys, read_json, write_json};

/// Paginated view over the pokemon catalog with local search.
///
/// All state is interior-mutable: page and visible-list changes are
/// published through `watch` channels, the snapshot sits behind an
/// `ArcSwap`. Every page mutation carries a token from a monotonic
/// counter; a response that is no longer the latest is discarded, so a
/// slow older fetch can never clobber a newer one.
pub struct Catalog {
    client: Arc<PokeApiClient>,
    storage: Arc<dyn Storage>,
    page_size: u32,

    page: watch::Sender<PageState>,
    visible: watch::Sender<Arc<Vec<Entity>>>,
    snapshot: ArcSwap<Vec<Entity>>,
    loading: watch::Sender<bool>,
    filtering: watch::Receiver<bool>,

    latest_request: AtomicU64,
    has_more: AtomicBool,
}

impl Catalog {
    pub fn new(
        client: Arc<PokeApiClient>,
        storage: Arc<dyn Storage>,
        page_size: u32,
        filtering: watch::Receiver<bool>,
    ) -> Self {
        let (page, _) = watch::channel(PageState::default());
        let (visible, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);

        Self {
            client,
            storage,
            page_size,
            page,
            visible,
            snapshot: ArcSwap::from_pointee(Vec::new()),
            loading,
            filtering,
            latest_request: AtomicU64::new(0),
            has_more: AtomicBool::new(true),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The list a consumer should currently render.
    pub fn visible(&self) -> Arc<Vec<Entity>> {
        self.visible.borrow().clone()
    }

    pub fn subscribe_visible(&self) -> watch::Receiver<Arc<Vec<Entity>>> {
        self.visible.subscribe()
    }

    /// The current paged slice, regardless of search/filter overlays.
    pub fn page(&self) -> PageState {
        self.page.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether facet filtering currently governs the visible list.
    pub fn is_filtering(&self) -> bool {
        *self.filtering.borrow()
    }

    /// Whether an append fetch may yield more results.
    pub fn has_more(&self) -> bool {
        self.has_more.load(Ordering::Acquire)
    }

    pub fn snapshot_len(&self) -> usize {
        self.snapshot.load().len()
    }

    // ── Request tokens ───────────────────────────────────────────────

    /// Claim the next request token. The latest token wins; anything
    /// older is discarded when it tries to apply its result.
    pub(crate) fn begin_request(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn is_latest(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::Acquire) == token
    }

    // ── Paging ───────────────────────────────────────────────────────

    /// Restore the persisted page from the local store, if any.
    ///
    /// Used at session start so the last page reappears without a
    /// network round-trip. Never writes back. Returns whether a cached
    /// page was found.
    pub async fn restore_cached_page(&self) -> Result<bool, CoreError> {
        let cached: Option<PageState> = read_json(self.storage.as_ref(), keys::POKEMON_PAGE)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable page cache");
                None
            });

        match cached {
            Some(state) => {
                self.has_more.store(state.next.is_some(), Ordering::Release);
                self.visible.send_replace(Arc::new(state.results.clone()));
                self.page.send_replace(state);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetch a page and replace the current page state.
    ///
    /// `url: None` fetches the first page at the configured page size;
    /// `Some(cursor)` follows a pagination cursor. On failure the prior
    /// state is left untouched and the error is returned. A response
    /// arriving after a newer request has been issued is discarded.
    pub async fn load_page(&self, url: Option<&str>) -> Result<(), CoreError> {
        let token = self.begin_request();
        self.loading.send_replace(true);

        let result = match url {
            Some(cursor) => self.client.fetch_page(cursor).await,
            None => self.client.list(Resource::Pokemon, self.page_size, 0).await,
        };

        self.loading.send_replace(false);
        let fetched = result?;

        if !self.is_latest(token) {
            debug!(token, "discarding stale page response");
            return Ok(());
        }

        self.apply_page(PageState::from(fetched)).await;
        Ok(())
    }

    /// Follow the `next` cursor, replacing the page.
    ///
    /// No-op while filtering is active or at the last page.
    pub async fn advance_page(&self) -> Result<(), CoreError> {
        if self.is_filtering() {
            debug!("pagination suppressed: filtering is active");
            return Ok(());
        }
        let Some(cursor) = self.page.borrow().next.clone() else {
            return Ok(());
        };
        self.load_page(Some(&cursor)).await
    }

    /// Follow the `previous` cursor, replacing the page.
    ///
    /// No-op while filtering is active or at the first page.
    pub async fn retreat_page(&self) -> Result<(), CoreError> {
        if self.is_filtering() {
            debug!("pagination suppressed: filtering is active");
            return Ok(());
        }
        let Some(cursor) = self.page.borrow().previous.clone() else {
            return Ok(());
        };
        self.load_page(Some(&cursor)).await
    }

    /// Infinite-scroll variant: fetch the `next` cursor and concatenate
    /// its results onto the current page instead of replacing it.
    pub async fn append_next_page(&self) -> Result<(), CoreError> {
        if self.is_filtering() {
            debug!("append suppressed: filtering is active");
            return Ok(());
        }
        let Some(cursor) = self.page.borrow().next.clone() else {
            self.has_more.store(false, Ordering::Release);
            return Ok(());
        };

        let token = self.begin_request();
        self.loading.send_replace(true);
        let result = self.client.fetch_page(&cursor).await;
        self.loading.send_replace(false);
        let fetched = result?;

        if !self.is_latest(token) {
            debug!(token, "discarding stale append response");
            return Ok(());
        }

        self.has_more
            .store(fetched.next.is_some(), Ordering::Release);

        let mut merged = self.page.borrow().clone();
        merged.next = fetched.next;
        merged.previous = fetched.previous;
        merged
            .results
            .extend(fetched.results.into_iter().map(Entity::from));

        self.apply_page(merged).await;
        Ok(())
    }

    /// Replace page state, publish it as the visible list, and persist.
    async fn apply_page(&self, state: PageState) {
        self.has_more.store(state.next.is_some(), Ordering::Release);
        self.visible.send_replace(Arc::new(state.results.clone()));
        self.page.send_replace(state.clone());

        if let Err(e) = write_json(self.storage.as_ref(), keys::POKEMON_PAGE, &state).await {
            warn!(error = %e, "failed to persist page cache");
        }
    }

    // ── Snapshot & search ────────────────────────────────────────────

    /// Make the full-catalog snapshot available: memory, then local
    /// store, then one oversized remote fetch.
    ///
    /// Returns the snapshot size. Callers treat errors as non-fatal;
    /// search simply degrades to empty results.
    pub async fn ensure_snapshot(&self) -> Result<usize, CoreError> {
        let in_memory = self.snapshot.load().len();
        if in_memory > 0 {
            return Ok(in_memory);
        }

        let cached: Option<Vec<Entity>> = read_json(self.storage.as_ref(), keys::POKEMON_SNAPSHOT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable snapshot cache");
                None
            });
        if let Some(entities) = cached {
            debug!(count = entities.len(), "using cached pokemon snapshot");
            let len = entities.len();
            self.snapshot.store(Arc::new(entities));
            return Ok(len);
        }

        debug!("fetching full pokemon snapshot");
        let page = self.client.list_all(Resource::Pokemon).await?;
        let entities: Vec<Entity> = page.results.into_iter().map(Entity::from).collect();

        if let Err(e) = write_json(self.storage.as_ref(), keys::POKEMON_SNAPSHOT, &entities).await {
            warn!(error = %e, "failed to persist pokemon snapshot");
        }

        let len = entities.len();
        self.snapshot.store(Arc::new(entities));
        Ok(len)
    }

    /// Drop the in-memory and persisted snapshot so the next
    /// [`ensure_snapshot`](Self::ensure_snapshot) refetches.
    pub async fn invalidate_snapshot(&self) {
        self.snapshot.store(Arc::new(Vec::new()));
        if let Err(e) = self.storage.remove(keys::POKEMON_SNAPSHOT).await {
            warn!(error = %e, "failed to drop snapshot cache");
        }
    }

    /// The current snapshot contents (possibly empty).
    pub fn snapshot(&self) -> Arc<Vec<Entity>> {
        self.snapshot.load_full()
    }

    /// Pure, synchronous search over the snapshot.
    ///
    /// Matches case-insensitive substrings of the name, or the exact
    /// numeric identifier. An empty query restores the paged view. The
    /// result becomes the visible list and is also returned.
    pub fn search(&self, text: &str) -> Vec<Entity> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            let paged = self.page.borrow().results.clone();
            self.visible.send_replace(Arc::new(paged.clone()));
            return paged;
        }

        let wanted_id = query.parse::<u64>().ok();
        let snapshot = self.snapshot.load();
        let matches: Vec<Entity> = snapshot
            .iter()
            .filter(|e| e.name.contains(&query) || (wanted_id.is_some() && e.id() == wanted_id))
            .cloned()
            .collect();

        self.visible.send_replace(Arc::new(matches.clone()));
        matches
    }

    // ── Filter integration ───────────────────────────────────────────

    /// Present a facet-filtered list. Cursors are untouched; the paged
    /// slice reappears when filtering clears.
    pub fn set_filtered(&self, list: Vec<Entity>) {
        self.visible.send_replace(Arc::new(list));
    }
}
