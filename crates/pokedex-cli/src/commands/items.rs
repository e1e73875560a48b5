//! Item catalog command handlers.

use pokedex_api::types::ItemDetails;
use pokedex_core::{Dex, Entity, Resource};

use crate::cli::{GlobalOpts, ItemsArgs, ItemsCommand};
use crate::error::CliError;
use crate::output;

use super::pokemon::render_entities;
use super::util;

pub async fn handle(dex: &Dex, args: ItemsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ItemsCommand::List { limit, offset } => {
            let page = dex
                .client()
                .list(Resource::Item, limit, offset)
                .await
                .map_err(pokedex_core::CoreError::from)?;

            let entities: Vec<Entity> = page.results.into_iter().map(Entity::from).collect();
            render_entities(&entities, global);
            if page.next.is_some() && !global.quiet {
                eprintln!("More available: --offset {}", offset + limit);
            }
            Ok(())
        }

        ItemsCommand::Show { item } => {
            let key = item.trim().to_lowercase();
            let details = dex
                .client()
                .get_item(&key)
                .await
                .map_err(|e| util::map_lookup_error(e, "item", &item, "items list"))?;

            let rendered = output::render_single(
                &global.output,
                &details,
                render_item_details,
                |d| d.id.to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

fn render_item_details(details: &ItemDetails) -> String {
    let mut out = format!("#{} {}\n  cost: {}", details.id, details.name, details.cost);
    if let Some(ref category) = details.category {
        out.push_str(&format!("\n  category: {}", category.name));
    }
    if let Some(effect) = details.short_effect() {
        out.push_str(&format!("\n  effect: {effect}"));
    }
    out
}
