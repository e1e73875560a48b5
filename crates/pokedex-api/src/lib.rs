// pokedex-api: Async Rust client for the PokeAPI REST catalog.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{PokeApiClient, SNAPSHOT_LIMIT};
pub use error::Error;
pub use transport::TransportConfig;
pub use types::Resource;
