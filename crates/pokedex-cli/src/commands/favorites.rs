//! Favorites command handlers.

use tracing::warn;

use pokedex_core::{Dex, Favorites};

use crate::cli::{FavoriteKind, FavoritesArgs, FavoritesCommand, GlobalOpts};
use crate::error::CliError;

use super::pokemon::render_entities;
use super::util;

fn store_for(dex: &Dex, kind: FavoriteKind) -> &Favorites {
    match kind {
        FavoriteKind::Pokemon => dex.favorites(),
        FavoriteKind::Items => dex.item_favorites(),
    }
}

pub async fn handle(dex: &Dex, args: FavoritesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FavoritesCommand::List { kind } => {
            let favorites = store_for(dex, kind);
            favorites.load().await;

            if favorites.is_empty() {
                util::notice("No favorites yet.", global);
                return Ok(());
            }

            // Hydration is all-or-nothing; fall back to the last
            // successfully hydrated list when it fails.
            let hydrated = match favorites.hydrate().await {
                Ok(entities) => entities,
                Err(e) => {
                    warn!(error = %e, "hydration failed; showing cached records");
                    favorites.hydrated()
                }
            };
            render_entities(&hydrated, global);
            Ok(())
        }

        FavoritesCommand::Add { id, kind } => {
            let favorites = store_for(dex, kind);
            favorites.load().await;

            if favorites.add(id).await {
                util::notice(&format!("Added #{id} to favorites."), global);
            } else {
                util::notice(&format!("#{id} is already a favorite."), global);
            }
            Ok(())
        }

        FavoritesCommand::Remove { id, kind } => {
            let favorites = store_for(dex, kind);
            favorites.load().await;

            if favorites.remove(id).await {
                util::notice(&format!("Removed #{id} from favorites."), global);
            } else {
                util::notice(&format!("#{id} was not a favorite."), global);
            }
            Ok(())
        }
    }
}
