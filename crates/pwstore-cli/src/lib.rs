//! pwstore command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pwstore_core::StoreConfig;

/// pwstore - encrypted per-service credential store
#[derive(Parser)]
#[command(name = "pwstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "PWSTORE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Credential tree root (overrides config)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Private key file (overrides config)
    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Credentials(commands::credentials::CredentialCommand),

    /// Load or generate the store key pair and print its location
    Init,

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "pwstore=info",
            1 => "pwstore=debug",
            _ => "pwstore=trace",
        }
    }

    /// Build the store configuration: file, then environment, then flags.
    pub fn store_config(&self) -> anyhow::Result<StoreConfig> {
        let mut config = StoreConfig::load_or_default(self.config.as_deref())?.apply_env();
        if let Some(dir) = &self.store_dir {
            config.store_dir = Some(dir.clone());
        }
        if let Some(key) = &self.key_file {
            config.private_key_file = Some(key.clone());
        }
        Ok(config)
    }
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Credentials(command) => {
            commands::credentials::run(&cli.store_config()?, command).await
        }
        Commands::Init => commands::key::init(&cli.store_config()?).await,
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Version => {
            println!("pwstore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
