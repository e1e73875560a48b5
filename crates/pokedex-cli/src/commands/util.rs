//! Shared helpers for command handlers.

use owo_colors::OwoColorize;

use pokedex_core::{CoreError, Dex, Entity, Resource};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::should_color;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Print a success notice to stderr, respecting quiet and color modes.
pub fn notice(message: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if should_color(&global.color) {
        eprintln!("{}", message.green());
    } else {
        eprintln!("{message}");
    }
}

/// Resolve a pokemon identifier (numeric id or name) to an [`Entity`]
/// keyed by its canonical URL, via a detail fetch.
pub async fn resolve_pokemon(dex: &Dex, identifier: &str) -> Result<Entity, CliError> {
    let key = identifier.trim().to_lowercase();
    let details = dex
        .client()
        .get_pokemon(&key)
        .await
        .map_err(|e| map_lookup_error(e, "pokemon", identifier, "pokemon list"))?;

    Ok(Entity::new(
        details.name,
        dex.client().canonical_url(Resource::Pokemon, details.id),
    ))
}

/// Map a lookup failure to a NotFound diagnostic when applicable.
pub fn map_lookup_error(
    err: pokedex_api::Error,
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    } else {
        CoreError::from(err).into()
    }
}
