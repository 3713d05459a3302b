//! Credential commands.
//!
//! Provides `pwstore get|set|delete|list|find` for managing encrypted
//! credentials via the `pwstore-secrets` crate.

use anyhow::Context;
use clap::Subcommand;
use pwstore_core::StoreConfig;
use pwstore_secrets::{CredentialStore, PasswordStore};
use tracing::debug;

#[derive(Subcommand)]
pub enum CredentialCommand {
    /// Retrieve and print a decrypted credential
    Get {
        /// Service name
        service: String,

        /// Account name
        account: String,
    },

    /// Store a credential (prompts for value)
    Set {
        /// Service name
        service: String,

        /// Account name
        account: String,

        /// Secret value (if omitted, prompts for hidden input)
        #[arg(long)]
        value: Option<String>,
    },

    /// Delete a credential
    Delete {
        /// Service name
        service: String,

        /// Account name
        account: String,
    },

    /// List the credentials stored for a service
    List {
        /// Service name
        service: String,

        /// Print accounts and decrypted secrets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a credential by its combined "service/account" name
    Find {
        /// Combined name, e.g. "Mail/alice"
        name: String,
    },
}

/// Run a credential command.
pub async fn run(config: &StoreConfig, command: &CredentialCommand) -> anyhow::Result<()> {
    let store = PasswordStore::from_config(config).context("Failed to initialize store")?;
    debug!(
        store_dir = %store.store_dir().display(),
        key_file = %store.key_manager().private_key_file().display(),
        "opened credential store"
    );

    match command {
        CredentialCommand::Get { service, account } => {
            match store.get_password(service, account).await? {
                Some(secret) => println!("{}", secret.expose()),
                None => anyhow::bail!("No credential stored for {service}/{account}"),
            }
        }

        CredentialCommand::Set {
            service,
            account,
            value,
        } => {
            let secret = match value {
                Some(v) => v.clone(),
                None => {
                    let prompt = format!("Enter password for {service}/{account}: ");
                    rpassword::prompt_password(prompt).context("Failed to read password")?
                }
            };

            store.set_password(service, account, &secret).await?;
            println!("Stored {service}/{account}.");
        }

        CredentialCommand::Delete { service, account } => {
            if store.delete_password(service, account).await? {
                println!("Deleted {service}/{account}.");
            } else {
                println!("No credential stored for {service}/{account}.");
            }
        }

        CredentialCommand::List { service, json } => {
            let credentials = store.find_credentials(service).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&credentials)?);
            } else if credentials.is_empty() {
                println!("No credentials stored for {service}.");
            } else {
                for credential in &credentials {
                    println!("{}", credential.account);
                }
                println!("\n{} credential(s) total.", credentials.len());
            }
        }

        CredentialCommand::Find { name } => match store.find_password(name).await? {
            Some(secret) => println!("{}", secret.expose()),
            None => anyhow::bail!("No credential stored for {name}"),
        },
    }

    Ok(())
}
