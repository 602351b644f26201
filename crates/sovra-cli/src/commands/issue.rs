//! `sovra issue` — Issue a self-signed credential from the vault's attributes.

use clap::Args;
use std::path::PathBuf;

use sovra_credentials::{Credential, CredentialStore};

use crate::config::CliConfig;
use crate::vault::Vault;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Credential identifier (defaults to a UTC timestamp).
    #[arg(long)]
    pub id: Option<String>,

    /// Vault directory (defaults to the active identity).
    #[arg(long)]
    pub vault: Option<PathBuf>,
}

pub fn run(args: &IssueArgs, config: &CliConfig) -> anyhow::Result<()> {
    let vault = super::resolve_vault(config, args.vault.as_ref())?;
    let id = issue_from_attributes(&vault, args.id.as_deref().unwrap_or_default())?;
    println!("Credential '{}' issued", id);
    Ok(())
}

/// Sign the vault's current attributes as a new credential and store it.
pub(crate) fn issue_from_attributes(vault: &Vault, id: &str) -> anyhow::Result<String> {
    let identity = vault.load()?;
    let attributes = vault.attributes()?;

    let mut credential = Credential::new(id, identity.did(), attributes);
    credential.sign(identity.keypair(), &identity.verification_method_id())?;
    vault.credentials().save(&credential)?;
    Ok(credential.id)
}
