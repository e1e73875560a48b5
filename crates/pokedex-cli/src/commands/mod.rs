//! Command dispatch: bridges CLI args -> Dex operations -> output
//! formatting.

pub mod config_cmd;
pub mod favorites;
pub mod filter;
pub mod items;
pub mod pokemon;
pub mod teams;
pub mod util;

use pokedex_core::Dex;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a Dex-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, dex: &Dex, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Pokemon(args) => pokemon::handle(dex, args, global).await,
        Command::Items(args) => items::handle(dex, args, global).await,
        Command::Filter(args) => filter::handle(dex, args, global).await,
        Command::Favorites(args) => favorites::handle(dex, args, global).await,
        Command::Teams(args) => teams::handle(dex, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
