//! Facet filter command handlers.

use serde::Serialize;
use tabled::Tabled;

use pokedex_core::{Dex, Entity};

use crate::cli::{FilterArgs, FilterCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::pokemon::render_entities;
use super::util;

pub async fn handle(dex: &Dex, args: FilterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FilterCommand::Types => {
            dex.filter().load_selection().await;
            dex.filter().load_facets().await?;
            let selected = dex.filter().selection().types;
            render_facets(&dex.filter().types_catalog(), |name| {
                selected.contains(name)
            }, global);
            Ok(())
        }

        FilterCommand::Generations => {
            dex.filter().load_selection().await;
            dex.filter().load_facets().await?;
            let selected = dex.filter().selection().generations;
            render_facets(&dex.filter().generations_catalog(), |name| {
                selected.contains(name)
            }, global);
            Ok(())
        }

        FilterCommand::Type { name } => {
            dex.init_catalog().await;
            dex.toggle_type(&name).await?;
            report_selection(dex, global);
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }

        FilterCommand::Generation { name } => {
            dex.init_catalog().await;
            dex.toggle_generation(&name).await?;
            report_selection(dex, global);
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }

        FilterCommand::Show => {
            dex.filter().load_selection().await;
            let selection = dex.filter().selection();
            let rendered = output::render_single(
                &global.output,
                &selection,
                |sel| {
                    format!(
                        "types:       {}\ngenerations: {}\nfiltering:   {}",
                        join_or_none(sel.types.iter()),
                        join_or_none(sel.generations.iter()),
                        if sel.is_empty() { "inactive" } else { "active" },
                    )
                },
                |sel| {
                    sel.types
                        .iter()
                        .chain(sel.generations.iter())
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        FilterCommand::Clear => {
            dex.filter().load_selection().await;
            dex.clear_filters().await?;
            util::notice("Filters cleared.", global);
            render_entities(&dex.catalog().visible(), global);
            Ok(())
        }
    }
}

fn report_selection(dex: &Dex, global: &GlobalOpts) {
    let selection = dex.filter().selection();
    if selection.is_empty() {
        util::notice("Selection is empty; showing the unfiltered page.", global);
    } else {
        util::notice(
            &format!(
                "Filtering by types [{}] generations [{}].",
                join_or_none(selection.types.iter()),
                join_or_none(selection.generations.iter()),
            ),
            global,
        );
    }
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.cloned().collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".into() } else { joined }
}

// ── Rendering ────────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct FacetRow {
    #[tabled(rename = "SEL")]
    selected: String,
    #[tabled(rename = "NAME")]
    name: String,
}

fn render_facets(
    catalog: &[Entity],
    is_selected: impl Fn(&str) -> bool,
    global: &GlobalOpts,
) {
    let rendered = output::render_list(
        &global.output,
        catalog,
        |facet| FacetRow {
            selected: if is_selected(&facet.name) { "*" } else { "" }.into(),
            name: facet.name.clone(),
        },
        |facet| facet.name.clone(),
    );
    output::print_output(&rendered, global.quiet);
}
