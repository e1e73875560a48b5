// Integration tests for the catalog manager: pagination, persistence,
// search, and the filtering/pagination precedence rule.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokedex_core::storage::{Storage, keys};
use pokedex_core::{Dex, MemoryStore, PageState};
use pokedex_api::PokeApiClient;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<MemoryStore>, Dex) {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStore::new());
    let base = format!("{}/api/v2", server.uri());
    let client = Arc::new(PokeApiClient::from_reqwest(&base, reqwest::Client::new()).unwrap());
    let dex = Dex::with_client(client, storage.clone(), 2, chrono::Duration::hours(1));
    (server, storage, dex)
}

fn named(name: &str, url: &str) -> serde_json::Value {
    json!({ "name": name, "url": url })
}

fn page_body(
    results: &[(&str, u64)],
    next: Option<String>,
    previous: Option<String>,
) -> serde_json::Value {
    let results: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, id)| named(name, &format!("https://pokeapi.co/api/v2/pokemon/{id}/")))
        .collect();
    json!({ "count": 1302, "next": next, "previous": previous, "results": results })
}

async fn mount_first_page(server: &MockServer, next: Option<String>) {
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[("bulbasaur", 1), ("ivysaur", 2)], next, None)),
        )
        .mount(server)
        .await;
}

// ── Paging ──────────────────────────────────────────────────────────

#[tokio::test]
async fn load_page_replaces_state_and_persists() {
    let (server, storage, dex) = setup().await;
    mount_first_page(&server, None).await;

    dex.catalog().load_page(None).await.unwrap();

    let visible = dex.catalog().visible();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].name, "bulbasaur");

    let persisted: PageState =
        serde_json::from_str(&storage.get(keys::POKEMON_PAGE).await.unwrap().unwrap()).unwrap();
    assert_eq!(persisted.results.len(), 2);
    assert!(persisted.next.is_none());
}

#[tokio::test]
async fn failed_load_leaves_prior_state_untouched() {
    let (server, _storage, dex) = setup().await;
    let cursor = format!("{}/api/v2/pokemon?offset=2&limit=2", server.uri());
    mount_first_page(&server, Some(cursor.clone())).await;

    dex.catalog().load_page(None).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = dex.catalog().load_page(Some(&cursor)).await.unwrap_err();
    assert!(!err.is_validation());

    let visible = dex.catalog().visible();
    assert_eq!(visible[0].name, "bulbasaur");
    assert!(!dex.catalog().is_loading());
}

#[tokio::test]
async fn advance_and_retreat_follow_cursors() {
    let (server, _storage, dex) = setup().await;
    let next = format!("{}/api/v2/pokemon?offset=2&limit=2", server.uri());
    let prev = format!("{}/api/v2/pokemon?offset=0&limit=2", server.uri());
    mount_first_page(&server, Some(next)).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &[("venusaur", 3), ("charmander", 4)],
            None,
            Some(prev),
        )))
        .mount(&server)
        .await;

    dex.catalog().load_page(None).await.unwrap();
    dex.catalog().advance_page().await.unwrap();
    assert_eq!(dex.catalog().visible()[0].name, "venusaur");
    assert!(!dex.catalog().has_more());

    // No next cursor on the second page: advancing again is a no-op.
    dex.catalog().advance_page().await.unwrap();
    assert_eq!(dex.catalog().visible()[0].name, "venusaur");

    dex.catalog().retreat_page().await.unwrap();
    assert_eq!(dex.catalog().visible()[0].name, "bulbasaur");
}

#[tokio::test]
async fn append_concatenates_results() {
    let (server, _storage, dex) = setup().await;
    let next = format!("{}/api/v2/pokemon?offset=2&limit=2", server.uri());
    mount_first_page(&server, Some(next)).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            &[("venusaur", 3), ("charmander", 4)],
            None,
            None,
        )))
        .mount(&server)
        .await;

    dex.catalog().load_page(None).await.unwrap();
    assert!(dex.catalog().has_more());

    dex.catalog().append_next_page().await.unwrap();
    let visible = dex.catalog().visible();
    assert_eq!(visible.len(), 4);
    assert_eq!(visible[3].name, "charmander");
    assert!(!dex.catalog().has_more());

    // Exhausted: appending again changes nothing.
    dex.catalog().append_next_page().await.unwrap();
    assert_eq!(dex.catalog().visible().len(), 4);
}

#[tokio::test]
async fn stale_page_response_is_discarded() {
    let (server, _storage, dex) = setup().await;

    // The first-page fetch is slow; the cursor fetch is fast.
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[("bulbasaur", 1)], None, None))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("offset", "50"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(&[("pikachu", 25)], None, None)),
        )
        .mount(&server)
        .await;

    let cursor = format!("{}/api/v2/pokemon?offset=50&limit=2", server.uri());
    let (slow, fast) = tokio::join!(
        dex.catalog().load_page(None),
        dex.catalog().load_page(Some(&cursor)),
    );
    slow.unwrap();
    fast.unwrap();

    // The slower, older request resolved last but must not win.
    assert_eq!(dex.catalog().visible()[0].name, "pikachu");
}

// ── Cache restore ───────────────────────────────────────────────────

#[tokio::test]
async fn cached_page_restores_without_network() {
    let (_server, storage, dex) = setup().await;

    let cached = PageState {
        results: vec![pokedex_core::Entity::new(
            "pikachu",
            "https://pokeapi.co/api/v2/pokemon/25/",
        )],
        next: None,
        previous: None,
    };
    storage
        .set(keys::POKEMON_PAGE, &serde_json::to_string(&cached).unwrap())
        .await
        .unwrap();

    assert!(dex.catalog().restore_cached_page().await.unwrap());
    assert_eq!(dex.catalog().visible()[0].name, "pikachu");
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_substring_and_exact_id() {
    let (server, storage, dex) = setup().await;
    mount_first_page(&server, None).await;
    dex.catalog().load_page(None).await.unwrap();

    let snapshot = vec![
        pokedex_core::Entity::new("pikachu", "https://pokeapi.co/api/v2/pokemon/25/"),
        pokedex_core::Entity::new("raichu", "https://pokeapi.co/api/v2/pokemon/26/"),
        pokedex_core::Entity::new("eevee", "https://pokeapi.co/api/v2/pokemon/133/"),
    ];
    storage
        .set(
            keys::POKEMON_SNAPSHOT,
            &serde_json::to_string(&snapshot).unwrap(),
        )
        .await
        .unwrap();
    dex.catalog().ensure_snapshot().await.unwrap();

    let by_name = dex.catalog().search("chu");
    assert_eq!(by_name.len(), 2);

    let by_id = dex.catalog().search("25");
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].name, "pikachu");

    // Empty query restores the paged view.
    let restored = dex.catalog().search("");
    assert_eq!(restored[0].name, "bulbasaur");
    assert_eq!(dex.catalog().visible()[0].name, "bulbasaur");
}

#[tokio::test]
async fn search_degrades_to_empty_without_snapshot() {
    let (_server, _storage, dex) = setup().await;
    assert!(dex.catalog().search("chu").is_empty());
}

#[tokio::test]
async fn snapshot_fetches_remotely_once_and_caches() {
    let (server, storage, dex) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon"))
        .and(query_param("limit", "100000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[("pikachu", 25), ("raichu", 26)], None, None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(dex.catalog().ensure_snapshot().await.unwrap(), 2);
    // Second call is served from memory.
    assert_eq!(dex.catalog().ensure_snapshot().await.unwrap(), 2);
    assert!(storage.get(keys::POKEMON_SNAPSHOT).await.unwrap().is_some());
}

// ── Filtering precedence ────────────────────────────────────────────

#[tokio::test]
async fn pagination_is_suppressed_while_filtering() {
    let (server, _storage, dex) = setup().await;
    let next = format!("{}/api/v2/pokemon?offset=2&limit=2", server.uri());
    mount_first_page(&server, Some(next)).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "next": null, "previous": null,
            "results": [named("fire", "https://pokeapi.co/api/v2/type/10/")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/generation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/type/fire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "name": "fire",
            "pokemon": [
                { "slot": 1, "pokemon": named("charmander", "https://pokeapi.co/api/v2/pokemon/4/") }
            ]
        })))
        .mount(&server)
        .await;

    dex.catalog().load_page(None).await.unwrap();
    dex.toggle_type("fire").await.unwrap();

    let filtered = dex.catalog().visible();
    assert_eq!(filtered[0].name, "charmander");

    // The next-cursor endpoint is not mounted: advancing must not even
    // try to fetch it while a facet is selected.
    dex.catalog().advance_page().await.unwrap();
    dex.catalog().retreat_page().await.unwrap();
    dex.catalog().append_next_page().await.unwrap();
    assert_eq!(dex.catalog().visible(), filtered);
}
