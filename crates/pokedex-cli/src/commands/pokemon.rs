//! Pokemon catalog command handlers: paging, search, details, snapshot
//! sync.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use pokedex_api::types::PokemonDetails;
use pokedex_core::{Dex, Entity};

use crate::cli::{GlobalOpts, PokemonArgs, PokemonCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(dex: &Dex, args: PokemonArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PokemonCommand::List => {
            dex.init_catalog().await;
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }

        PokemonCommand::Next => {
            dex.init_catalog().await;
            if dex.catalog().is_filtering() {
                util::notice("Facet filters are active; pagination is disabled.", global);
                return Ok(());
            }
            dex.catalog().advance_page().await?;
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }

        PokemonCommand::Prev => {
            dex.init_catalog().await;
            if dex.catalog().is_filtering() {
                util::notice("Facet filters are active; pagination is disabled.", global);
                return Ok(());
            }
            dex.catalog().retreat_page().await?;
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }

        PokemonCommand::More => {
            dex.init_catalog().await;
            if dex.catalog().is_filtering() {
                util::notice("Facet filters are active; pagination is disabled.", global);
                return Ok(());
            }
            dex.catalog().append_next_page().await?;
            render_entities(&dex.catalog().visible(), global);
            if !dex.catalog().has_more() && !global.quiet {
                eprintln!("End of catalog reached.");
            }
            Ok(())
        }

        PokemonCommand::Search { query } => {
            dex.init_catalog().await;
            if let Err(e) = dex.catalog().ensure_snapshot().await {
                warn!(error = %e, "snapshot unavailable; search results may be empty");
            }
            let matches = dex.catalog().search(&query);
            render_entities(&matches, global);
            Ok(())
        }

        PokemonCommand::Show { pokemon } => {
            let key = pokemon.trim().to_lowercase();
            let details = dex
                .client()
                .get_pokemon(&key)
                .await
                .map_err(|e| util::map_lookup_error(e, "pokemon", &pokemon, "pokemon list"))?;

            let rendered = output::render_single(
                &global.output,
                &details,
                render_pokemon_details,
                |d| d.id.to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        PokemonCommand::Sync { types, force } => sync(dex, types, force, global).await,
    }
}

// ── Snapshot sync ────────────────────────────────────────────────────

async fn sync(dex: &Dex, types: bool, force: bool, global: &GlobalOpts) -> Result<(), CliError> {
    if force {
        dex.catalog().invalidate_snapshot().await;
    }
    let count = dex.catalog().ensure_snapshot().await?;
    util::notice(&format!("Snapshot ready: {count} pokemon."), global);

    if types {
        let snapshot = dex.catalog().snapshot();

        let bar = if global.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                    .expect("progress template should be valid"),
            );
            bar.set_message("tagging types");
            bar
        };

        let tagged = dex
            .filter()
            .build_typed_snapshot(&snapshot, |done, total| {
                bar.set_length(u64::try_from(total).unwrap_or(u64::MAX));
                bar.set_position(u64::try_from(done).unwrap_or(u64::MAX));
            })
            .await?;
        bar.finish_and_clear();

        util::notice(&format!("Type tags ready: {tagged} entries."), global);
    }
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct EntityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
}

fn entity_row(entity: &Entity) -> EntityRow {
    EntityRow {
        id: entity.id().map_or_else(String::new, |id| id.to_string()),
        name: entity.name.clone(),
    }
}

pub(crate) fn render_entities(entities: &[Entity], global: &GlobalOpts) {
    let rendered = output::render_list(&global.output, entities, entity_row, |e| e.name.clone());
    output::print_output(&rendered, global.quiet);
}

fn render_pokemon_details(details: &PokemonDetails) -> String {
    let types: Vec<&str> = details
        .types
        .iter()
        .map(|t| t.type_ref.name.as_str())
        .collect();

    let mut out = format!(
        "#{} {}\n  types:  {}\n  height: {}\n  weight: {}",
        details.id,
        details.name,
        types.join(", "),
        details.height,
        details.weight,
    );

    if !details.stats.is_empty() {
        out.push_str("\n  stats:");
        for stat in &details.stats {
            out.push_str(&format!("\n    {:16} {}", stat.stat.name, stat.base_stat));
        }
    }
    if let Some(ref sprite) = details.sprites.front_default {
        out.push_str(&format!("\n  sprite: {sprite}"));
    }
    out
}
