// ── Team domain type ──

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Maximum roster size for a team.
pub const TEAM_CAPACITY: usize = 6;

/// A named, colored roster of up to [`TEAM_CAPACITY`] pokemon.
///
/// `id` is a monotonic-time-derived string unique within the collection;
/// `name` is unique at creation time. Roster entries are unique by url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub color: String,
    pub background_color: String,
    #[serde(default)]
    pub pokemon: Vec<Entity>,
}

impl Team {
    pub fn is_full(&self) -> bool {
        self.pokemon.len() >= TEAM_CAPACITY
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.pokemon.iter().any(|p| p.url == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(n: usize) -> Vec<Entity> {
        (1..=n)
            .map(|i| {
                Entity::new(
                    format!("mon-{i}"),
                    format!("https://pokeapi.co/api/v2/pokemon/{i}/"),
                )
            })
            .collect()
    }

    #[test]
    fn full_at_capacity() {
        let team = Team {
            id: "1".into(),
            name: "Alpha".into(),
            color: "#000000".into(),
            background_color: "#cccccc".into(),
            pokemon: roster_of(TEAM_CAPACITY),
        };
        assert!(team.is_full());
    }

    #[test]
    fn membership_is_by_url() {
        let team = Team {
            id: "1".into(),
            name: "Alpha".into(),
            color: "#000000".into(),
            background_color: "#cccccc".into(),
            pokemon: roster_of(2),
        };
        assert!(team.contains_url("https://pokeapi.co/api/v2/pokemon/2/"));
        assert!(!team.contains_url("https://pokeapi.co/api/v2/pokemon/3/"));
    }
}
