// ── Team roster manager ──
//
// A persisted collection of named, colored, capacity-bounded rosters.
// Every roster mutation re-serializes the whole collection; the initial
// load never writes back.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{Entity, Team};
use crate::storage::{Storage, keys, read_json, write_json};

/// Owns the team collection. Screens and CLI handlers reference teams
/// by id only; all mutation goes through this manager.
pub struct TeamRoster {
    storage: Arc<dyn Storage>,
    teams: watch::Sender<Arc<Vec<Team>>>,
}

impl TeamRoster {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (teams, _) = watch::channel(Arc::new(Vec::new()));
        Self { storage, teams }
    }

    // ── Session restore ──────────────────────────────────────────────

    /// Load the persisted collection. Never writes back, so a failed or
    /// empty read cannot clobber previously stored teams.
    pub async fn load(&self) {
        let stored: Option<Vec<Team>> = read_json(self.storage.as_ref(), keys::TEAMS)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "ignoring unreadable team collection");
                None
            });

        if let Some(teams) = stored {
            self.teams.send_replace(Arc::new(teams));
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn teams(&self) -> Arc<Vec<Team>> {
        self.teams.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Team>>> {
        self.teams.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Team> {
        self.teams.borrow().iter().find(|t| t.id == id).cloned()
    }

    /// Resolve a team by id or, failing that, by exact name.
    pub fn find(&self, identifier: &str) -> Option<Team> {
        let teams = self.teams.borrow();
        teams
            .iter()
            .find(|t| t.id == identifier)
            .or_else(|| teams.iter().find(|t| t.name == identifier))
            .cloned()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Create a team with an empty roster.
    ///
    /// Rejects empty names and names already taken by another team.
    pub async fn create(
        &self,
        name: &str,
        color: &str,
        background_color: &str,
    ) -> Result<Team, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyTeamName);
        }
        if self.teams.borrow().iter().any(|t| t.name == name) {
            return Err(CoreError::DuplicateTeamName { name: name.into() });
        }

        let team = Team {
            id: next_team_id(&self.teams.borrow()),
            name: name.into(),
            color: color.into(),
            background_color: background_color.into(),
            pokemon: Vec::new(),
        };

        self.teams.send_modify(|teams| {
            let mut updated = (**teams).clone();
            updated.push(team.clone());
            *teams = Arc::new(updated);
        });
        self.persist().await;
        Ok(team)
    }

    /// Replace a stored team wholesale, matched by id.
    ///
    /// Name uniqueness is deliberately not re-validated here.
    pub async fn update(&self, team: Team) -> Result<(), CoreError> {
        let mut found = false;
        self.teams.send_modify(|teams| {
            let mut updated = (**teams).clone();
            if let Some(slot) = updated.iter_mut().find(|t| t.id == team.id) {
                *slot = team.clone();
                found = true;
            }
            *teams = Arc::new(updated);
        });

        if !found {
            return Err(CoreError::TeamNotFound {
                identifier: team.id,
            });
        }
        self.persist().await;
        Ok(())
    }

    /// Delete a team unconditionally. Returns the removed team, if any.
    pub async fn remove(&self, id: &str) -> Option<Team> {
        let mut removed = None;
        self.teams.send_modify(|teams| {
            let mut updated = (**teams).clone();
            if let Some(pos) = updated.iter().position(|t| t.id == id) {
                removed = Some(updated.remove(pos));
            }
            *teams = Arc::new(updated);
        });

        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    // ── Roster mutation ──────────────────────────────────────────────

    /// Append a pokemon to a team's roster.
    ///
    /// Rejects when the roster is full or the entity (by url) is
    /// already present.
    pub async fn add_pokemon(&self, team_id: &str, entity: Entity) -> Result<(), CoreError> {
        let team = self
            .get(team_id)
            .ok_or_else(|| CoreError::TeamNotFound {
                identifier: team_id.into(),
            })?;

        if team.is_full() {
            return Err(CoreError::TeamFull { name: team.name });
        }
        if team.contains_url(&entity.url) {
            return Err(CoreError::DuplicateTeamMember {
                team: team.name,
                pokemon: entity.name,
            });
        }

        self.teams.send_modify(|teams| {
            let mut updated = (**teams).clone();
            if let Some(slot) = updated.iter_mut().find(|t| t.id == team_id) {
                slot.pokemon.push(entity.clone());
            }
            *teams = Arc::new(updated);
        });
        self.persist().await;
        Ok(())
    }

    /// Remove a roster entry by url. No-op when the team or the entry
    /// is absent.
    pub async fn remove_pokemon(&self, team_id: &str, url: &str) {
        let mut changed = false;
        self.teams.send_modify(|teams| {
            let mut updated = (**teams).clone();
            if let Some(slot) = updated.iter_mut().find(|t| t.id == team_id) {
                let before = slot.pokemon.len();
                slot.pokemon.retain(|p| p.url != url);
                changed = slot.pokemon.len() != before;
            }
            *teams = Arc::new(updated);
        });

        if changed {
            self.persist().await;
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    async fn persist(&self) {
        let teams = self.teams.borrow().clone();
        if let Err(e) = write_json(self.storage.as_ref(), keys::TEAMS, &*teams).await {
            warn!(error = %e, "failed to persist team collection");
        }
    }
}

/// Derive a fresh team id from wall-clock millis, bumping past any id
/// already taken in the collection.
fn next_team_id(existing: &[Team]) -> String {
    let mut candidate = Utc::now().timestamp_millis().max(1);
    while existing.iter().any(|t| t.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;
    use crate::model::TEAM_CAPACITY;
    use crate::storage::MemoryStore;

    fn mon(id: u64) -> Entity {
        Entity::new(
            format!("mon-{id}"),
            format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        )
    }

    fn roster() -> TeamRoster {
        TeamRoster::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let roster = roster();
        let a = roster.create("Alpha", "#000", "#ccc").await.unwrap();
        let b = roster.create("Beta", "#000", "#ccc").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(roster.teams().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let roster = roster();
        roster.create("Alpha", "#000", "#ccc").await.unwrap();

        let err = roster.create("Alpha", "#fff", "#000").await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateTeamName { .. }));
        assert_eq!(roster.teams().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let roster = roster();
        let err = roster.create("   ", "#000", "#ccc").await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyTeamName));
    }

    #[tokio::test]
    async fn roster_capacity_is_enforced() {
        let roster = roster();
        let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        for i in 1..=TEAM_CAPACITY {
            roster.add_pokemon(&team.id, mon(i as u64)).await.unwrap();
        }

        let err = roster.add_pokemon(&team.id, mon(99)).await.unwrap_err();
        assert!(matches!(err, CoreError::TeamFull { .. }));
        assert_eq!(roster.get(&team.id).unwrap().pokemon.len(), TEAM_CAPACITY);
    }

    #[tokio::test]
    async fn duplicate_member_is_rejected() {
        let roster = roster();
        let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        roster.add_pokemon(&team.id, mon(25)).await.unwrap();
        let err = roster.add_pokemon(&team.id, mon(25)).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateTeamMember { .. }));
        assert_eq!(roster.get(&team.id).unwrap().pokemon.len(), 1);
    }

    #[tokio::test]
    async fn remove_pokemon_is_noop_when_absent() {
        let roster = roster();
        let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        roster.add_pokemon(&team.id, mon(25)).await.unwrap();
        roster
            .remove_pokemon(&team.id, "https://pokeapi.co/api/v2/pokemon/1/")
            .await;
        assert_eq!(roster.get(&team.id).unwrap().pokemon.len(), 1);

        roster
            .remove_pokemon(&team.id, "https://pokeapi.co/api/v2/pokemon/25/")
            .await;
        assert!(roster.get(&team.id).unwrap().pokemon.is_empty());

        // Missing team is also a no-op.
        roster.remove_pokemon("nope", "whatever").await;
    }

    #[tokio::test]
    async fn update_replaces_by_id() {
        let roster = roster();
        let mut team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        team.name = "Omega".into();
        team.color = "#ff0000".into();
        roster.update(team.clone()).await.unwrap();

        assert_eq!(roster.get(&team.id).unwrap().name, "Omega");
    }

    #[tokio::test]
    async fn update_unknown_team_errors() {
        let roster = roster();
        let team = Team {
            id: "missing".into(),
            name: "Ghost".into(),
            color: "#000".into(),
            background_color: "#ccc".into(),
            pokemon: Vec::new(),
        };
        let err = roster.update(team).await.unwrap_err();
        assert!(matches!(err, CoreError::TeamNotFound { .. }));
    }

    #[tokio::test]
    async fn remove_is_unconditional() {
        let roster = roster();
        let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        assert!(roster.remove(&team.id).await.is_some());
        assert!(roster.remove(&team.id).await.is_none());
        assert!(roster.teams().is_empty());
    }

    #[tokio::test]
    async fn mutations_round_trip_through_storage() {
        let storage = Arc::new(MemoryStore::new());
        let team_id = {
            let roster = TeamRoster::new(storage.clone());
            let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();
            roster.add_pokemon(&team.id, mon(25)).await.unwrap();
            team.id
        };

        let reloaded = TeamRoster::new(storage);
        reloaded.load().await;
        let team = reloaded.get(&team_id).unwrap();
        assert_eq!(team.name, "Alpha");
        assert_eq!(team.pokemon, vec![mon(25)]);
    }

    #[tokio::test]
    async fn initial_load_never_writes_back() {
        let storage = Arc::new(MemoryStore::new());
        let roster = TeamRoster::new(storage.clone());
        roster.load().await;
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn find_resolves_id_then_name() {
        let roster = roster();
        let team = roster.create("Alpha", "#000", "#ccc").await.unwrap();

        assert_eq!(roster.find(&team.id).unwrap().id, team.id);
        assert_eq!(roster.find("Alpha").unwrap().id, team.id);
        assert!(roster.find("Beta").is_none());
    }
}
