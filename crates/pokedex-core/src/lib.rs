// pokedex-core: Catalog cache, filtering, favorites, and team rosters
// between pokedex-api and consumers (CLI).

pub mod catalog;
pub mod dex;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod model;
pub mod storage;
pub mod teams;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::Catalog;
pub use dex::{Dex, DexConfig};
pub use error::CoreError;
pub use favorites::Favorites;
pub use filter::{FilterManager, Selection};
pub use storage::{FileStore, MemoryStore, Storage, StorageError};
pub use teams::TeamRoster;

// Re-export model types at the crate root for ergonomics.
pub use model::{Entity, PageState, Resource, TEAM_CAPACITY, Team, TypedEntity, TypedSnapshot};
