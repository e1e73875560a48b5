// ── Local key-value persistence ──
//
// An asynchronous string-keyed store with JSON values. Managers own
// disjoint key namespaces; nothing here enforces that beyond the
// constants in [`keys`].

mod file;
mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Well-known keys, one namespace per manager.
pub mod keys {
    /// Catalog: the current paginated slice.
    pub const POKEMON_PAGE: &str = "pokemon_page";
    /// Catalog: the full-catalog search snapshot.
    pub const POKEMON_SNAPSHOT: &str = "pokemon_snapshot";
    /// Filter: the type-enriched snapshot with fetch timestamp.
    pub const TYPED_SNAPSHOT: &str = "pokemon_snapshot_typed";
    /// Filter: the type facet catalog.
    pub const TYPE_CATALOG: &str = "type_catalog";
    /// Filter: the generation facet catalog.
    pub const GENERATION_CATALOG: &str = "generation_catalog";
    /// Filter: the persisted facet selection.
    pub const FILTER_SELECTION: &str = "filter_selection";
    /// Favorites: pokemon id set.
    pub const FAVORITE_POKEMON: &str = "favorite_pokemon";
    /// Favorites: hydrated pokemon records.
    pub const FAVORITE_POKEMON_HYDRATED: &str = "favorite_pokemon_hydrated";
    /// Favorites: item id set.
    pub const FAVORITE_ITEMS: &str = "favorite_items";
    /// Favorites: hydrated item records.
    pub const FAVORITE_ITEMS_HYDRATED: &str = "favorite_items_hydrated";
    /// Teams: the whole team collection.
    pub const TEAMS: &str = "teams";
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt value under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// ── Trait ───────────────────────────────────────────────────────────

/// Asynchronous get/set/remove over string keys.
///
/// Values are opaque strings (JSON by convention). Implementations are
/// best-effort: no transactions, no schema versioning.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ── Typed helpers ───────────────────────────────────────────────────

/// Read and deserialize a JSON value, `None` when the key is absent.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_owned(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value.
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw).await
}
