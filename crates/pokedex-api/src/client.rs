// Hand-crafted async HTTP client for the PokeAPI REST catalog (v2).
//
// Base path: /api/v2/
// No authentication; list endpoints take limit/offset query parameters.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    GenerationDetails, ItemDetails, PokemonDetails, Resource, ResourcePage, TypeDetails,
};

/// Deliberately oversized page limit used to pull an entire catalog in
/// one request (the "full snapshot" fetch).
pub const SNAPSHOT_LIMIT: u32 = 100_000;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the PokeAPI catalog.
///
/// Pure I/O wrapper: URL construction, pagination parameters, and
/// response decoding. All policy (caching, filtering, persistence)
/// lives in `pokedex-core`.
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with a single trailing slash so that
    /// `Url::join` treats it as a directory.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL this client addresses.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Canonical URL of a record, e.g. `{base}/pokemon/25/`.
    ///
    /// This is the URL shape the rest of the system keys entities by.
    pub fn canonical_url(&self, resource: Resource, id: u64) -> String {
        format!("{}{}/{id}/", self.base_url, resource.path())
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"pokemon/25"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining a relative path works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            let raw = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            })
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Listings ─────────────────────────────────────────────────────

    /// Fetch one page of a resource listing.
    pub async fn list(
        &self,
        resource: Resource,
        limit: u32,
        offset: u32,
    ) -> Result<ResourcePage, Error> {
        self.get_with_params(
            resource.path(),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    /// Fetch the entire catalog of a resource in one oversized request.
    pub async fn list_all(&self, resource: Resource) -> Result<ResourcePage, Error> {
        self.list(resource, SNAPSHOT_LIMIT, 0).await
    }

    /// Follow an opaque pagination cursor URL.
    ///
    /// The cursor must point inside this client's base URL; anything
    /// else is rejected rather than fetched.
    pub async fn fetch_page(&self, cursor: &str) -> Result<ResourcePage, Error> {
        let url = Url::parse(cursor)?;
        if !cursor.starts_with(self.base_url.as_str()) {
            return Err(Error::ForeignCursor { url: cursor.into() });
        }
        self.get(url).await
    }

    // ── Details ──────────────────────────────────────────────────────

    /// Fetch a pokemon detail record by numeric id or name.
    pub async fn get_pokemon(&self, key: &str) -> Result<PokemonDetails, Error> {
        self.get(self.url(&format!("pokemon/{key}"))).await
    }

    /// Fetch an item detail record by numeric id or name.
    pub async fn get_item(&self, key: &str) -> Result<ItemDetails, Error> {
        self.get(self.url(&format!("item/{key}"))).await
    }

    /// Fetch a type's member list by type name.
    pub async fn get_type(&self, name: &str) -> Result<TypeDetails, Error> {
        self.get(self.url(&format!("type/{name}"))).await
    }

    /// Fetch a generation's species list by generation name.
    pub async fn get_generation(&self, name: &str) -> Result<GenerationDetails, Error> {
        self.get(self.url(&format!("generation/{name}"))).await
    }
}
