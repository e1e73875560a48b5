//! Team roster command handlers.

use serde::Serialize;
use tabled::Tabled;

use pokedex_core::{Dex, Team};

use crate::cli::{GlobalOpts, TeamsArgs, TeamsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(dex: &Dex, args: TeamsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    dex.teams().load().await;

    match args.command {
        TeamsCommand::List => {
            let teams = dex.teams().teams();
            let rendered =
                output::render_list(&global.output, &teams, team_row, |t| t.id.clone());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        TeamsCommand::Create {
            name,
            color,
            background_color,
        } => {
            let team = dex.teams().create(&name, &color, &background_color).await?;
            util::notice(&format!("Created team '{}' (id {}).", team.name, team.id), global);
            Ok(())
        }

        TeamsCommand::Show { team } => {
            let team = resolve_team(dex, &team)?;
            let rendered =
                output::render_single(&global.output, &team, render_team_details, |t| {
                    t.id.clone()
                });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        TeamsCommand::Update {
            team,
            name,
            color,
            background_color,
        } => {
            let mut team = resolve_team(dex, &team)?;
            if let Some(name) = name {
                team.name = name;
            }
            if let Some(color) = color {
                team.color = color;
            }
            if let Some(background_color) = background_color {
                team.background_color = background_color;
            }
            dex.teams().update(team.clone()).await?;
            util::notice(&format!("Updated team '{}'.", team.name), global);
            Ok(())
        }

        TeamsCommand::Delete { team } => {
            let team = resolve_team(dex, &team)?;
            let prompt = format!("Delete team '{}'? This is destructive.", team.name);
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            dex.teams().remove(&team.id).await;
            util::notice(&format!("Deleted team '{}'.", team.name), global);
            Ok(())
        }

        TeamsCommand::Add { team, pokemon } => {
            let team = resolve_team(dex, &team)?;
            let entity = util::resolve_pokemon(dex, &pokemon).await?;
            let name = entity.name.clone();
            dex.teams().add_pokemon(&team.id, entity).await?;
            util::notice(&format!("Added {name} to team '{}'.", team.name), global);
            Ok(())
        }

        TeamsCommand::Remove { team, pokemon } => {
            let team = resolve_team(dex, &team)?;

            // Resolve against the roster itself so removal works offline.
            let wanted = pokemon.trim().to_lowercase();
            let member = team.pokemon.iter().find(|p| {
                p.name == wanted || p.id().is_some_and(|id| wanted.parse() == Ok(id))
            });

            match member {
                Some(member) => {
                    let name = member.name.clone();
                    dex.teams().remove_pokemon(&team.id, &member.url).await;
                    util::notice(&format!("Removed {name} from team '{}'.", team.name), global);
                }
                None => util::notice(
                    &format!("'{pokemon}' is not on team '{}'.", team.name),
                    global,
                ),
            }
            Ok(())
        }
    }
}

fn resolve_team(dex: &Dex, identifier: &str) -> Result<Team, CliError> {
    dex.teams().find(identifier).ok_or_else(|| CliError::NotFound {
        resource_type: "team".into(),
        identifier: identifier.into(),
        list_command: "teams list".into(),
    })
}

// ── Rendering ────────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct TeamRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "POKEMON")]
    pokemon: String,
    #[tabled(rename = "COLOR")]
    color: String,
}

fn team_row(team: &Team) -> TeamRow {
    TeamRow {
        id: team.id.clone(),
        name: team.name.clone(),
        pokemon: format!("{}/{}", team.pokemon.len(), pokedex_core::TEAM_CAPACITY),
        color: team.color.clone(),
    }
}

fn render_team_details(team: &Team) -> String {
    let mut out = format!(
        "{} (id {})\n  colors: {} on {}\n  roster: {}/{}",
        team.name,
        team.id,
        team.color,
        team.background_color,
        team.pokemon.len(),
        pokedex_core::TEAM_CAPACITY,
    );
    for member in &team.pokemon {
        let id = member.id().map_or_else(String::new, |id| id.to_string());
        out.push_str(&format!("\n    #{id:<5} {}", member.name));
    }
    out
}
