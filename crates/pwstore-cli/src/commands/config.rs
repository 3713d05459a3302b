//! Configuration management commands.

use clap::Args;
use pwstore_core::paths;

use crate::Cli;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let resolved = cli.store_config()?.resolve()?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }

        ConfigCommand::Path => {
            let path = match &cli.config {
                Some(path) => paths::expand_tilde(path),
                None => paths::config_file()?,
            };
            println!("{}", path.display());
        }
    }

    Ok(())
}
