//! Clap derive structures for the `pokedex` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pokedex -- browse, search, filter, favorite, and build teams
#[derive(Debug, Parser)]
#[command(
    name = "pokedex",
    version,
    about = "Browse the pokemon catalog from the command line",
    long_about = "A command-line pokedex backed by the public PokeAPI.\n\n\
        Pages, search results, facet selections, favorites, and teams are\n\
        cached in a local data directory, so repeat lookups work offline.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API base URL (overrides config)
    #[arg(long, env = "POKEDEX_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Data directory for local caches (overrides config)
    #[arg(long, env = "POKEDEX_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Listing page size (overrides config)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "POKEDEX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "POKEDEX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and search the pokemon catalog
    #[command(alias = "p")]
    Pokemon(PokemonArgs),

    /// Browse the item catalog
    #[command(alias = "i")]
    Items(ItemsArgs),

    /// Select type/generation facets to filter the catalog
    #[command(alias = "f")]
    Filter(FilterArgs),

    /// Manage favorite pokemon and items
    #[command(alias = "fav")]
    Favorites(FavoritesArgs),

    /// Build and manage teams of up to six pokemon
    #[command(alias = "t")]
    Teams(TeamsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Pokemon ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PokemonArgs {
    #[command(subcommand)]
    pub command: PokemonCommand,
}

#[derive(Debug, Subcommand)]
pub enum PokemonCommand {
    /// Show the current page of the catalog
    #[command(alias = "ls")]
    List,

    /// Advance to the next page
    Next,

    /// Go back to the previous page
    Prev,

    /// Fetch the next page and append it to the current one
    More,

    /// Search the cached catalog snapshot by name or id
    Search {
        /// Substring of a name, or an exact numeric id
        query: String,
    },

    /// Show one pokemon's details
    Show {
        /// Numeric id or name
        pokemon: String,
    },

    /// Download the full catalog snapshot used for search
    Sync {
        /// Also tag every entry with its types (enables offline
        /// type filtering; one request per type)
        #[arg(long)]
        types: bool,

        /// Refetch even when a snapshot is already cached
        #[arg(long)]
        force: bool,
    },
}

// ── Items ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ItemsArgs {
    #[command(subcommand)]
    pub command: ItemsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// List items
    #[command(alias = "ls")]
    List {
        /// Max results per page
        #[arg(long, short = 'l', default_value = "20")]
        limit: u32,

        /// Pagination offset
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Show one item's details
    Show {
        /// Numeric id or name
        item: String,
    },
}

// ── Filter ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub command: FilterCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilterCommand {
    /// List the type facet catalog with selection markers
    Types,

    /// List the generation facet catalog with selection markers
    Generations,

    /// Toggle a type facet and show the filtered list
    Type {
        /// Type name (e.g. "fire")
        name: String,
    },

    /// Toggle a generation facet and show the filtered list
    Generation {
        /// Generation name (e.g. "generation-i")
        name: String,
    },

    /// Show the active selection
    Show,

    /// Clear the selection and restore the unfiltered page
    Clear,
}

// ── Favorites ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FavoriteKind {
    Pokemon,
    Items,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List favorites with their hydrated records
    #[command(alias = "ls")]
    List {
        /// Which favorite set to use
        #[arg(long, value_enum, default_value = "pokemon")]
        kind: FavoriteKind,
    },

    /// Add an id to the favorite set
    Add {
        /// Numeric id
        id: u64,

        /// Which favorite set to use
        #[arg(long, value_enum, default_value = "pokemon")]
        kind: FavoriteKind,
    },

    /// Remove an id from the favorite set
    #[command(alias = "rm")]
    Remove {
        /// Numeric id
        id: u64,

        /// Which favorite set to use
        #[arg(long, value_enum, default_value = "pokemon")]
        kind: FavoriteKind,
    },
}

// ── Teams ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TeamsArgs {
    #[command(subcommand)]
    pub command: TeamsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeamsCommand {
    /// List all teams
    #[command(alias = "ls")]
    List,

    /// Create a new team
    Create {
        /// Team name (unique)
        name: String,

        /// Accent color
        #[arg(long, default_value = "#000000")]
        color: String,

        /// Background color
        #[arg(long = "background", default_value = "#cccccc")]
        background_color: String,
    },

    /// Show one team's roster
    Show {
        /// Team id or name
        team: String,
    },

    /// Rename or recolor a team
    Update {
        /// Team id or name
        team: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New accent color
        #[arg(long)]
        color: Option<String>,

        /// New background color
        #[arg(long = "background")]
        background_color: Option<String>,
    },

    /// Delete a team
    #[command(alias = "rm")]
    Delete {
        /// Team id or name
        team: String,
    },

    /// Add a pokemon to a team's roster
    Add {
        /// Team id or name
        team: String,

        /// Pokemon id or name
        pokemon: String,
    },

    /// Remove a pokemon from a team's roster
    Remove {
        /// Team id or name
        team: String,

        /// Pokemon id or name
        pokemon: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
