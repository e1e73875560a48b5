//! Builds the `Dex` from config file + environment + CLI flag overrides.

use std::sync::Arc;

use pokedex_core::{Dex, FileStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load configuration, apply CLI overrides, and construct a [`Dex`]
/// backed by the file store in the resolved data directory.
pub fn build_dex(global: &GlobalOpts) -> Result<Dex, CliError> {
    let config = effective_config(global)?;
    let storage = Arc::new(FileStore::new(config.resolve_data_dir()));
    let dex = Dex::new(&config.to_dex_config(), storage)?;
    Ok(dex)
}

/// The merged configuration: file + env, with CLI flags winning.
pub fn effective_config(global: &GlobalOpts) -> Result<pokedex_config::Config, CliError> {
    let mut config = pokedex_config::load_config_or_default();

    if let Some(ref url) = global.api_url {
        config.api_url = url.clone();
    }
    if let Some(ref dir) = global.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(size) = global.page_size {
        config.page_size = size;
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}
