//! Key pair commands.

use anyhow::Context;
use pwstore_core::StoreConfig;
use pwstore_secrets::PasswordStore;

/// Resolve the store key pair, generating it if needed, and report where it lives.
pub async fn init(config: &StoreConfig) -> anyhow::Result<()> {
    let resolved = config.resolve()?;
    let existed = resolved.private_key_file.exists();

    let store = PasswordStore::open(resolved)
        .await
        .context("Failed to load or generate the store key pair")?;
    let keys = store.key_manager();

    if existed {
        println!("Using existing key pair.");
    } else {
        println!("Generated a new key pair.");
    }
    println!("Private key: {}", keys.private_key_file().display());
    println!("Public key:  {}", keys.public_key_file().display());
    println!("Store:       {}", store.store_dir().display());

    let key = keys.ready().await?;
    println!("Recipient:   {}", key.public_key());
    Ok(())
}
