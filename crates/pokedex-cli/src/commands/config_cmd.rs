//! Configuration command handlers (no Dex required).

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::context;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", pokedex_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let config = context::effective_config(global)?;
            let rendered = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&config).map_err(pokedex_config::ConfigError::from)?
                }
                ref other => output::render_single(other, &config, |_| String::new(), |_| {
                    String::new()
                }),
            };
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = pokedex_config::config_path();
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    ),
                });
            }

            let config = context::effective_config(global)?;
            pokedex_config::save_config(&config)?;
            util::notice(&format!("Wrote {}.", path.display()), global);
            Ok(())
        }
    }
}
