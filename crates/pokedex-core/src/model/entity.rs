// ── Core identity types ──
//
// Entity is the universal `{name, url}` reference every manager trades
// in. The numeric identifier is encoded as the trailing path segment of
// the URL; identifier spaces are disjoint per resource kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pokedex_api::types::NamedResource;

/// Extract the numeric identifier from a catalog URL.
///
/// The id is the last non-empty path segment, e.g.
/// `https://pokeapi.co/api/v2/pokemon/25/` -> `25`. Returns `None` for
/// URLs that do not end in a positive integer.
pub fn extract_id(url: &str) -> Option<u64> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    trimmed
        .rsplit('/')
        .find(|segment| !segment.is_empty())?
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
}

// ── Entity ──────────────────────────────────────────────────────────

/// A named, URL-identified catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub url: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The numeric identifier encoded in this entity's URL.
    pub fn id(&self) -> Option<u64> {
        extract_id(&self.url)
    }
}

impl From<NamedResource> for Entity {
    fn from(res: NamedResource) -> Self {
        Self {
            name: res.name,
            url: res.url,
        }
    }
}

// ── Page state ──────────────────────────────────────────────────────

/// The currently visible slice of a paginated listing, plus its cursors.
///
/// `next`/`previous` are fetchable URLs or `None` at either end.
/// `results` ordering is server-defined and must be preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageState {
    pub results: Vec<Entity>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl From<pokedex_api::types::ResourcePage> for PageState {
    fn from(page: pokedex_api::types::ResourcePage) -> Self {
        Self {
            results: page.results.into_iter().map(Entity::from).collect(),
            next: page.next,
            previous: page.previous,
        }
    }
}

// ── Enriched snapshot ───────────────────────────────────────────────

/// A snapshot entry pre-tagged with its type names, used for offline
/// type filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedEntity {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl TypedEntity {
    /// True when this entry carries every type in `wanted`.
    pub fn has_all_types<'a>(&self, mut wanted: impl Iterator<Item = &'a str>) -> bool {
        wanted.all(|t| self.types.iter().any(|have| have == t))
    }

    pub fn to_entity(&self) -> Entity {
        Entity::new(self.name.clone(), self.url.clone())
    }
}

/// The type-enriched full-catalog snapshot, stamped with its fetch time
/// so staleness can be judged against a TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub entries: Vec<TypedEntity>,
}

impl TypedSnapshot {
    pub fn new(entries: Vec<TypedEntity>) -> Self {
        Self {
            fetched_at: Utc::now(),
            entries,
        }
    }

    /// Whether this snapshot is younger than `ttl`.
    pub fn is_fresh(&self, ttl: chrono::Duration) -> bool {
        Utc::now() - self.fetched_at <= ttl
    }
}
