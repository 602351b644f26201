//! `sovra show` — Show the active DID document and its credentials.

use clap::Args;

use sovra_credentials::CredentialStore;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print a single credential in full.
    pub id: Option<String>,
}

pub fn run(args: &ShowArgs, config: &CliConfig) -> anyhow::Result<()> {
    let vault = super::resolve_vault(config, None)?;
    let store = vault.credentials();

    if let Some(id) = &args.id {
        let credential = store.get(id)?;
        println!("{}", String::from_utf8(credential.to_json_bytes()?)?);
        return Ok(());
    }

    println!("{}", String::from_utf8(vault.did_document_bytes()?)?);
    for id in store.list_ids()? {
        let credential = store.get(&id)?;
        println!(
            "- {}: {}",
            credential.id,
            serde_json::Value::Object(credential.credential_subject)
        );
    }
    Ok(())
}
