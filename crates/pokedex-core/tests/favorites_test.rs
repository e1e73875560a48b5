// Integration tests for the favorites store: set semantics, persistence,
// and all-or-nothing hydration.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokedex_api::PokeApiClient;
use pokedex_core::storage::keys;
use pokedex_core::storage::Storage;
use pokedex_core::{Favorites, MemoryStore};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<MemoryStore>, Arc<PokeApiClient>) {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStore::new());
    let base = format!("{}/api/v2", server.uri());
    let client = Arc::new(PokeApiClient::from_reqwest(&base, reqwest::Client::new()).unwrap());
    (server, storage, client)
}

async fn mount_pokemon(server: &MockServer, id: u64, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/pokemon/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": id, "name": name })),
        )
        .mount(server)
        .await;
}

// ── Membership ──────────────────────────────────────────────────────

#[tokio::test]
async fn add_then_remove_restores_absence() {
    let (_server, storage, client) = setup().await;
    let favorites = Favorites::pokemon(client, storage);

    assert!(favorites.add(25).await);
    assert!(favorites.contains(25));

    assert!(favorites.remove(25).await);
    assert!(!favorites.contains(25));

    // Removing an absent id is a no-op, not an error.
    assert!(!favorites.remove(25).await);
}

#[tokio::test]
async fn add_enforces_set_semantics() {
    let (_server, storage, client) = setup().await;
    let favorites = Favorites::pokemon(client, storage);

    assert!(favorites.add(25).await);
    assert!(!favorites.add(25).await);
    assert_eq!(favorites.ids(), vec![25]);
}

#[tokio::test]
async fn ids_survive_a_new_session() {
    let (_server, storage, client) = setup().await;
    {
        let favorites = Favorites::pokemon(client.clone(), storage.clone());
        favorites.add(25).await;
        favorites.add(133).await;
    }

    let reloaded = Favorites::pokemon(client, storage);
    reloaded.load().await;
    assert_eq!(reloaded.ids(), vec![25, 133]);
}

#[tokio::test]
async fn pokemon_and_item_sets_are_disjoint() {
    let (_server, storage, client) = setup().await;
    let pokemon = Favorites::pokemon(client.clone(), storage.clone());
    let items = Favorites::items(client, storage);

    pokemon.add(25).await;
    assert!(pokemon.contains(25));
    assert!(!items.contains(25));
    assert!(items.is_empty());
}

// ── Hydration ───────────────────────────────────────────────────────

#[tokio::test]
async fn hydrate_fetches_every_favorite() {
    let (server, storage, client) = setup().await;
    mount_pokemon(&server, 25, "pikachu").await;
    mount_pokemon(&server, 26, "raichu").await;

    let favorites = Favorites::pokemon(client, storage.clone());
    favorites.add(25).await;
    favorites.add(26).await;

    let hydrated = favorites.hydrate().await.unwrap();
    assert_eq!(hydrated.len(), 2);
    assert_eq!(hydrated[0].name, "pikachu");
    assert_eq!(
        hydrated[0].url,
        format!("{}/api/v2/pokemon/25/", server.uri())
    );

    // The hydrated list is persisted for the next session.
    assert!(
        storage
            .get(keys::FAVORITE_POKEMON_HYDRATED)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn failed_hydration_retains_previous_list() {
    let (server, storage, client) = setup().await;
    mount_pokemon(&server, 25, "pikachu").await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let favorites = Favorites::pokemon(client, storage);
    favorites.add(25).await;
    favorites.hydrate().await.unwrap();
    assert_eq!(favorites.hydrated().len(), 1);

    // One bad id poisons the whole batch; the previous list stays.
    favorites.add(999).await;
    assert!(favorites.hydrate().await.is_err());
    let hydrated = favorites.hydrated();
    assert_eq!(hydrated.len(), 1);
    assert_eq!(hydrated[0].name, "pikachu");
}

#[tokio::test]
async fn item_favorites_hydrate_through_the_item_endpoint() {
    let (server, storage, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/item/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "poke-ball", "cost": 200
        })))
        .mount(&server)
        .await;

    let favorites = Favorites::items(client, storage);
    favorites.add(4).await;

    let hydrated = favorites.hydrate().await.unwrap();
    assert_eq!(hydrated[0].name, "poke-ball");
    assert_eq!(hydrated[0].url, format!("{}/api/v2/item/4/", server.uri()));
}
