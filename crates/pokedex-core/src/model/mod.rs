// ── Domain model ──
//
// Canonical types every manager trades in. Wire shapes from
// `pokedex-api` are converted at the boundary and never leak upward.

pub mod entity;
pub mod team;

pub use entity::{Entity, PageState, TypedEntity, TypedSnapshot, extract_id};
pub use team::{TEAM_CAPACITY, Team};

// The resource kinds are shared with the api crate verbatim.
pub use pokedex_api::types::Resource;
