// Wire types mirroring the PokeAPI response shapes.
//
// Field names follow the JSON payloads exactly (snake_case on the wire),
// so no rename gymnastics are needed except for the reserved word `type`.

use serde::{Deserialize, Serialize};

// ── Resource kinds ──────────────────────────────────────────────────

/// The catalog resources this client knows how to address.
///
/// Identifier spaces are disjoint per resource: pokemon #25 and item #25
/// are unrelated records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Pokemon,
    Item,
    Type,
    Generation,
}

impl Resource {
    /// The URL path segment for this resource.
    pub fn path(self) -> &'static str {
        self.into()
    }
}

// ── List endpoints ──────────────────────────────────────────────────

/// A `{name, url}` reference to a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One slice of a paginated listing.
///
/// `next`/`previous` are opaque cursor URLs (or `null` at either end);
/// `results` ordering is server-defined and preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

// ── Pokemon detail ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonTypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokemonSprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// Detail record for a single pokemon (subset of the full payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    pub sprites: PokemonSprites,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
}

// ── Item detail ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectEntry {
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub short_effect: String,
    pub language: NamedResource,
}

/// Detail record for a single item (subset of the full payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cost: u64,
    pub category: Option<NamedResource>,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

impl ItemDetails {
    /// English short-effect text, if present.
    pub fn short_effect(&self) -> Option<&str> {
        self.effect_entries
            .iter()
            .find(|e| e.language.name == "en")
            .map(|e| e.short_effect.as_str())
    }
}

// ── Type detail ─────────────────────────────────────────────────────

/// A `{pokemon, slot}` membership entry in a type's member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeMember {
    #[serde(default)]
    pub slot: u8,
    pub pokemon: NamedResource,
}

/// Detail record for a type: its member pokemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

// ── Generation detail ───────────────────────────────────────────────

/// Detail record for a generation: the species it introduced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub pokemon_species: Vec<NamedResource>,
}
